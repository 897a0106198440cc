use std::fmt::Debug;
use std::sync::Mutex;

/// Performs a hard navigation, replacing whatever the front end is showing.
pub trait Navigator: Send + Sync + Debug {
    fn navigate(&self, route: &str);
}

/// Remembers every route it was asked to open.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn routes(&self) -> Vec<String> {
        self.routes.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: &str) {
        self.routes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(route.to_string());
    }
}
