//! 画面状態のステートマシン
//!
//! ユーザー操作と通信結果はすべて [`SessionEvent`] として [`Session::dispatch`] に渡す。
//! 通信が必要な場合は [`Command`] を返すので、呼び出し側が実行して結果を
//! 再びイベントとして渡す。ここではネットワークにもUIにも触れない。
//!
//! ```text
//! Idle ──SubmitRequested(検証NG)──▶ Rejected
//! Idle ──SubmitRequested(検証OK)──▶ Submitting ──SubmissionFinished──▶ Done(outcome)
//! ```
//!
//! Done / Rejected からはそのまま次の送信を受け付ける。

use crate::error::ValidationError;
use crate::outcome::{interpret, SanitizeResponse, SubmissionOutcome};
use crate::preview::{filename_preview, location_preview};
use crate::status::StatusMessage;
use crate::types::{
    Artifact, CityDirectory, FileHandle, FileSelection, FormField, FormFields, FormSnapshot,
    LocationChoice,
};
use crate::validator::validate;
use crate::verify::{interpret_verify, VerifyState};
use serde_json::Value;

/// 送信フローの状態
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UiState {
    #[default]
    Idle,
    Submitting { file_count: usize },
    Done(SubmissionOutcome),
    Rejected(ValidationError),
}

/// ユーザー操作・通信完了イベント
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// ファイル選択ダイアログで選択
    FilesSelected(Vec<FileHandle>),
    DragEnter,
    DragOver,
    DragLeave,
    /// ドロップゾーンにドロップ
    Drop(Vec<FileHandle>),
    CityChanged(Option<String>),
    /// `/api/cities` の取得結果（失敗はログのみ）
    CitiesLoaded {
        city: String,
        result: Result<CityDirectory, String>,
    },
    KeywordChanged(String),
    FieldEdited(FormField, String),
    RandomPerPhotoToggled(bool),
    SubmitRequested,
    /// `/api/sanitize` の応答、または通信エラーの説明
    SubmissionFinished(Result<SanitizeResponse, String>),
    /// アーカイブのローカル保存に失敗
    ArtifactSaveFailed(String),
    VerifyFileSelected(Option<FileHandle>),
    VerifyFinished(Result<Value, String>),
}

/// 呼び出し側に依頼する副作用
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    FetchCities { city: String },
    Submit(FormSnapshot),
    SaveArtifact(Artifact),
    Verify(FileHandle),
}

/// イベント処理の結果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reaction {
    /// ブラウザのデフォルト動作（ドロップ時のページ遷移など）を抑止する
    pub prevent_default: bool,
    pub command: Option<Command>,
}

impl Reaction {
    fn none() -> Self {
        Self::default()
    }

    fn prevent_default() -> Self {
        Self { prevent_default: true, command: None }
    }

    fn command(command: Command) -> Self {
        Self { prevent_default: false, command: Some(command) }
    }
}

/// 描画用の読み取り専用ビュー
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView {
    pub state: UiState,
    pub submit_enabled: bool,
    pub drag_active: bool,
    pub file_tags: Vec<String>,
    /// 進捗表示（None なら非表示）
    pub progress: Option<String>,
    pub status: Option<StatusMessage>,
    pub location_preview: Option<String>,
    pub filename_preview: Option<String>,
    pub verify: Option<String>,
}

/// 1画面分のセッション
#[derive(Debug, Clone)]
pub struct Session {
    selection: FileSelection,
    form: FormFields,
    state: UiState,
    drag_active: bool,
    submit_enabled: bool,
    progress: Option<String>,
    status: Option<StatusMessage>,
    location_preview: Option<String>,
    filename_preview: Option<String>,
    verify: VerifyState,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(FormFields::default())
    }
}

impl Session {
    pub fn new(form: FormFields) -> Self {
        let mut session = Self {
            selection: FileSelection::default(),
            form,
            state: UiState::Idle,
            drag_active: false,
            submit_enabled: false,
            progress: None,
            status: None,
            location_preview: None,
            filename_preview: None,
            verify: VerifyState::Idle,
        };
        session.refresh_filename_preview();
        session
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn form(&self) -> &FormFields {
        &self.form
    }

    pub fn selection(&self) -> &FileSelection {
        &self.selection
    }

    pub fn verify_state(&self) -> &VerifyState {
        &self.verify
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.state, UiState::Submitting { .. })
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            state: self.state.clone(),
            submit_enabled: self.submit_enabled,
            drag_active: self.drag_active,
            file_tags: self.selection.tags(),
            progress: self.progress.clone(),
            status: self.status.clone(),
            location_preview: self.location_preview.clone(),
            filename_preview: self.filename_preview.clone(),
            verify: self.verify.text(),
        }
    }

    /// イベントを1件処理する
    pub fn dispatch(&mut self, event: SessionEvent) -> Reaction {
        match event {
            SessionEvent::FilesSelected(files) => {
                self.replace_selection(files);
                Reaction::none()
            }
            SessionEvent::DragEnter | SessionEvent::DragOver => {
                self.drag_active = true;
                Reaction::prevent_default()
            }
            SessionEvent::DragLeave => {
                self.drag_active = false;
                Reaction::prevent_default()
            }
            SessionEvent::Drop(files) => {
                self.drag_active = false;
                self.replace_selection(files);
                Reaction::prevent_default()
            }
            SessionEvent::CityChanged(city) => self.on_city_changed(city),
            SessionEvent::CitiesLoaded { city, result } => {
                self.on_cities_loaded(&city, result);
                Reaction::none()
            }
            SessionEvent::KeywordChanged(keyword) => {
                self.form.keyword = keyword;
                self.refresh_filename_preview();
                Reaction::none()
            }
            SessionEvent::FieldEdited(field, value) => {
                self.form.set(field, value);
                Reaction::none()
            }
            SessionEvent::RandomPerPhotoToggled(checked) => {
                self.form.random_device_per_photo = checked;
                Reaction::none()
            }
            SessionEvent::SubmitRequested => self.on_submit_requested(),
            SessionEvent::SubmissionFinished(result) => self.on_submission_finished(result),
            SessionEvent::ArtifactSaveFailed(message) => {
                self.status = Some(SubmissionOutcome::Failed(message).status());
                Reaction::none()
            }
            SessionEvent::VerifyFileSelected(file) => match file {
                Some(file) => {
                    self.verify = VerifyState::Reading;
                    Reaction::command(Command::Verify(file))
                }
                None => Reaction::none(),
            },
            SessionEvent::VerifyFinished(result) => {
                self.verify = match result {
                    Ok(data) => interpret_verify(&data),
                    Err(message) => VerifyState::Failed(message),
                };
                Reaction::none()
            }
        }
    }

    fn replace_selection(&mut self, files: Vec<FileHandle>) {
        self.selection = FileSelection::new(files);
        // 送信中はボタンを無効のまま維持する
        if !self.is_submitting() {
            self.submit_enabled = !self.selection.is_empty();
        }
        self.status = None;
    }

    fn on_city_changed(&mut self, city: Option<String>) -> Reaction {
        self.form.city = city.unwrap_or_default();
        self.refresh_filename_preview();

        match self.form.selected_city() {
            Some(city) => Reaction::command(Command::FetchCities { city: city.to_string() }),
            None => {
                self.location_preview = None;
                Reaction::none()
            }
        }
    }

    fn on_cities_loaded(&mut self, city: &str, result: Result<CityDirectory, String>) {
        match result {
            Ok(directory) => {
                if self.form.selected_city() != Some(city) {
                    tracing::debug!(city, "discarding city lookup for a deselected city");
                } else if let Some(record) = directory.lookup(city) {
                    self.location_preview = Some(location_preview(&record));
                }
            }
            Err(error) => {
                tracing::warn!(city, %error, "city lookup failed, location preview not updated");
            }
        }
        self.refresh_filename_preview();
    }

    fn refresh_filename_preview(&mut self) {
        self.filename_preview = filename_preview(&self.form.keyword, self.form.selected_city());
    }

    fn on_submit_requested(&mut self) -> Reaction {
        if self.is_submitting() {
            tracing::debug!("submit ignored while a submission is in flight");
            return Reaction::none();
        }
        self.status = None;

        let location = LocationChoice::from_form(&self.form);
        if let Err(reason) = validate(&self.selection, &location) {
            self.status = Some(StatusMessage::warning(reason.to_string()));
            self.state = UiState::Rejected(reason);
            return Reaction::none();
        }

        let snapshot = FormSnapshot::capture(&self.form, &self.selection);
        let file_count = snapshot.file_count();

        self.submit_enabled = false;
        self.progress = Some(format!(
            "Procesando {} foto(s)... Esto puede tardar unos segundos.",
            file_count
        ));
        self.state = UiState::Submitting { file_count };

        Reaction::command(Command::Submit(snapshot))
    }

    fn on_submission_finished(&mut self, result: Result<SanitizeResponse, String>) -> Reaction {
        let file_count = match self.state {
            UiState::Submitting { file_count } => file_count,
            _ => {
                tracing::warn!("submission result received with no submission in flight");
                return Reaction::none();
            }
        };

        // どの結果でも必ずロックを解除する
        self.submit_enabled = true;
        self.progress = None;

        let outcome = match result {
            Ok(response) => interpret(response, file_count),
            Err(description) => SubmissionOutcome::Failed(description),
        };

        self.status = Some(outcome.status());
        let save = outcome.artifact().cloned().map(Command::SaveArtifact);
        self.state = UiState::Done(outcome);

        Reaction { prevent_default: false, command: save }
    }
}
