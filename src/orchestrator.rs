//! 送信フローの実行
//!
//! [`Session`] が返す [`Command`] を実際に実行し、その結果を再びイベントとして渡す。
//! セッションのロックは `.await` をまたいで保持しないので、
//! 送信中でも検証フローを並行して進められる。

use crate::client::SanitizerApi;
use crate::error::Result;
use gmb_sanitizer_common::outcome::DEFAULT_ARCHIVE_NAME;
use gmb_sanitizer_common::{
    Artifact, Command, FileHandle, Session, SessionEvent, SessionView, VerifyState,
};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// 状態が変わるたびに呼ばれる描画先
pub trait Renderer: Send + Sync {
    fn render(&self, view: &SessionView);

    /// アーカイブを保存した直後に呼ばれる
    fn artifact_saved(&self, _path: &Path) {}
}

/// ダウンロードしたアーカイブの保存先
pub trait ArtifactSink: Send + Sync {
    fn save(&self, artifact: &Artifact) -> Result<PathBuf>;
}

/// 指定ディレクトリに保存する
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ArtifactSink for DirectorySink {
    fn save(&self, artifact: &Artifact) -> Result<PathBuf> {
        // サーバー提示の名前からディレクトリ部分は取り除く
        let file_name = Path::new(&artifact.file_name)
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| DEFAULT_ARCHIVE_NAME.into());

        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file_name);
        std::fs::write(&path, &artifact.bytes)?;
        Ok(path)
    }
}

pub struct Orchestrator<A: SanitizerApi> {
    api: A,
    session: Mutex<Session>,
    sink: Box<dyn ArtifactSink>,
    renderer: Box<dyn Renderer>,
}

impl<A: SanitizerApi> Orchestrator<A> {
    pub fn new(
        api: A,
        session: Session,
        sink: Box<dyn ArtifactSink>,
        renderer: Box<dyn Renderer>,
    ) -> Self {
        Self {
            api,
            session: Mutex::new(session),
            sink,
            renderer,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn view(&self) -> SessionView {
        self.lock().view()
    }

    pub fn verify_state(&self) -> VerifyState {
        self.lock().verify_state().clone()
    }

    /// イベントを処理し、続くコマンドがなくなるまで実行する
    ///
    /// 戻り値は最初のイベントでデフォルト動作を抑止すべきかどうか。
    pub async fn dispatch(&self, event: SessionEvent) -> bool {
        let mut next = Some(event);
        let mut prevent_default = None;

        while let Some(event) = next.take() {
            let (reaction, view) = {
                let mut session = self.lock();
                let reaction = session.dispatch(event);
                (reaction, session.view())
            };
            self.renderer.render(&view);
            prevent_default.get_or_insert(reaction.prevent_default);

            if let Some(command) = reaction.command {
                next = self.execute(command).await;
            }
        }

        prevent_default.unwrap_or(false)
    }

    async fn execute(&self, command: Command) -> Option<SessionEvent> {
        match command {
            Command::FetchCities { city } => {
                let result = self.api.fetch_cities().await.map_err(|e| e.to_string());
                Some(SessionEvent::CitiesLoaded { city, result })
            }
            Command::Submit(snapshot) => {
                let result = self.api.sanitize(&snapshot).await.map_err(|e| {
                    tracing::warn!(error = %e, "sanitize request failed");
                    e.to_string()
                });
                Some(SessionEvent::SubmissionFinished(result))
            }
            Command::SaveArtifact(artifact) => match self.sink.save(&artifact) {
                Ok(path) => {
                    tracing::info!(path = %path.display(), bytes = artifact.bytes.len(), "archive saved");
                    self.renderer.artifact_saved(&path);
                    None
                }
                Err(e) => {
                    tracing::error!(error = %e, "failed to save archive");
                    Some(SessionEvent::ArtifactSaveFailed(e.to_string()))
                }
            },
            Command::Verify(file) => {
                let result = self.api.verify(&file).await.map_err(|e| e.to_string());
                Some(SessionEvent::VerifyFinished(result))
            }
        }
    }

    pub async fn select_files(&self, files: Vec<FileHandle>) {
        self.dispatch(SessionEvent::FilesSelected(files)).await;
    }

    pub async fn change_city(&self, city: Option<String>) {
        self.dispatch(SessionEvent::CityChanged(city)).await;
    }

    pub async fn submit(&self) -> SessionView {
        self.dispatch(SessionEvent::SubmitRequested).await;
        self.view()
    }

    pub async fn verify_file(&self, file: Option<FileHandle>) -> SessionView {
        self.dispatch(SessionEvent::VerifyFileSelected(file)).await;
        self.view()
    }
}
