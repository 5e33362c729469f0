//! GMB Photo Sanitizer Common Library
//!
//! ネットワークに依存しない型とロジック:
//! スラッグ生成、入力検証、プレビュー、応答の解釈、画面状態のステートマシン

pub mod error;
pub mod outcome;
pub mod preview;
pub mod session;
pub mod slug;
pub mod status;
pub mod types;
pub mod validator;
pub mod verify;

pub use error::{Error, Result, ValidationError};
pub use outcome::{
    classify, extract_filename, interpret, OutcomeClass, SanitizeResponse, SubmissionOutcome,
};
pub use preview::{filename_preview, location_preview};
pub use session::{Command, Reaction, Session, SessionEvent, SessionView, UiState};
pub use slug::slugify;
pub use status::{StatusKind, StatusMessage};
pub use types::{
    Artifact, CityDirectory, CityEntry, CityRecord, FileHandle, FileSelection, FormData,
    FormField, FormFields, FormSnapshot, LocationChoice, OutcomeReport,
};
pub use validator::{can_submit, validate};
pub use verify::{interpret_verify, VerifyState};
