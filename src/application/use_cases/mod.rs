/// Use cases module containing application business logic orchestration
mod scan_project;

pub use scan_project::ScanProjectUseCase;
