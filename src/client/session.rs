use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::client::notice::Notice;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Session {
    LoggedOut,
    LoggedIn { username: String },
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Please enter both username and password")]
    MissingCredentials,
    #[error("session storage: {0}")]
    Io(#[from] io::Error),
    #[error("session encoding: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Where the session survives between runs. Not consulted while running.
pub trait SessionStore {
    fn load(&self) -> Result<Option<Session>, SessionError>;
    fn save(&self, session: &Session) -> Result<(), SessionError>;
    fn clear(&self) -> Result<(), SessionError>;
}

pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>, SessionError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&self.path, serde_json::to_vec(session)?)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Students,
    Add,
    Edit(i64),
}

/// Client-only login flag. Not a security boundary.
pub struct SessionGate<S: SessionStore> {
    store: S,
    session: Session,
}

impl<S: SessionStore> SessionGate<S> {
    /// Restores the persisted session; unreadable state counts as logged out.
    pub fn init(store: S) -> Self {
        let session = match store.load() {
            Ok(Some(session)) => session,
            Ok(None) => Session::LoggedOut,
            Err(e) => {
                warn!(error = %e, "discarding unreadable session");
                Session::LoggedOut
            }
        };
        debug!(?session, "session restored");
        Self { store, session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(self.session, Session::LoggedIn { .. })
    }

    pub fn username(&self) -> &str {
        match &self.session {
            Session::LoggedIn { username } => username,
            Session::LoggedOut => "User",
        }
    }

    /// Any non-empty username/password pair is accepted.
    pub fn login(&mut self, username: &str, password: &str) -> Result<Notice, SessionError> {
        if username.is_empty() || password.is_empty() {
            return Err(SessionError::MissingCredentials);
        }
        let session = Session::LoggedIn {
            username: username.to_string(),
        };
        self.store.save(&session)?;
        self.session = session;
        Ok(Notice::success(format!("Welcome, {username}!")))
    }

    pub fn logout(&mut self) -> Result<Notice, SessionError> {
        self.store.clear()?;
        self.session = Session::LoggedOut;
        Ok(Notice::info("Logged out successfully"))
    }

    /// Routes other than login need a logged-in session; otherwise redirect to login.
    pub fn guard(&self, route: Route) -> Route {
        match route {
            Route::Login => Route::Login,
            _ if self.is_logged_in() => route,
            _ => Route::Login,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate(dir: &tempfile::TempDir) -> SessionGate<FileSessionStore> {
        SessionGate::init(FileSessionStore::new(dir.path().join("nested/session.json")))
    }

    #[test]
    fn starts_logged_out_and_guards_routes() {
        let dir = tempfile::tempdir().unwrap();
        let g = gate(&dir);
        assert_eq!(g.session(), &Session::LoggedOut);
        assert_eq!(g.guard(Route::Students), Route::Login);
        assert_eq!(g.guard(Route::Edit(3)), Route::Login);
        assert_eq!(g.guard(Route::Login), Route::Login);
        assert_eq!(g.username(), "User");
    }

    #[test]
    fn empty_credentials_do_not_log_in() {
        let dir = tempfile::tempdir().unwrap();
        let mut g = gate(&dir);
        for (u, p) in [("", "secret"), ("admin", ""), ("", "")] {
            assert!(matches!(g.login(u, p), Err(SessionError::MissingCredentials)));
            assert!(!g.is_logged_in());
        }
    }

    #[test]
    fn any_non_empty_pair_logs_in_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let mut g = gate(&dir);
        let notice = g.login("admin", "x").unwrap();
        assert_eq!(notice.message, "Welcome, admin!");
        assert_eq!(g.guard(Route::Add), Route::Add);
        assert_eq!(g.username(), "admin");

        let restored = gate(&dir);
        assert!(restored.is_logged_in());
        assert_eq!(restored.username(), "admin");
    }

    #[test]
    fn logout_clears_persisted_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut g = gate(&dir);
        g.login("admin", "x").unwrap();
        g.logout().unwrap();
        assert!(!g.is_logged_in());
        assert!(!gate(&dir).is_logged_in());
        // logging out twice is harmless
        g.logout().unwrap();
    }

    #[test]
    fn corrupt_session_file_means_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));
        fs::write(store.path(), b"not json").unwrap();
        assert!(!SessionGate::init(store).is_logged_in());
    }
}
