//! Candidate and job records consumed by the evaluation engine

pub mod candidate;
pub mod job;
pub mod job_parser;

pub use candidate::{CandidateProfile, EducationEntry, ExperienceEntry};
pub use job::{JobInput, JobRequirement};
pub use job_parser::JobDescriptionParser;
