use std::sync::Arc;

use seija_shared::DashboardStats;

use crate::{
    api::{envelope_message, ApiClient},
    articles::LoadState,
    auth::AuthStore,
};

/// Cached aggregate counters for the admin dashboard.
pub struct AdminDashboard {
    client: Arc<ApiClient>,
    stats: Option<DashboardStats>,
    state: LoadState,
}

impl AdminDashboard {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            stats: None,
            state: LoadState::Idle,
        }
    }

    pub fn stats(&self) -> Option<&DashboardStats> {
        self.stats.as_ref()
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// `GET /admin/statistics`. Only sent for an authenticated admin; anyone
    /// else gets `None` without a request.
    pub async fn fetch_statistics(&mut self, auth: &AuthStore) -> Option<&DashboardStats> {
        if !auth.is_admin() {
            tracing::warn!("statistics require an admin session");
            self.state = LoadState::Failed("Admin access required".to_string());
            return None;
        }

        self.state = LoadState::Loading;
        match self.client.get_statistics().await {
            Ok(envelope) if envelope.success => match envelope.data {
                Some(stats) => {
                    self.stats = Some(stats);
                    self.state = LoadState::Loaded;
                },
                None => self.state = LoadState::Empty,
            },
            Ok(envelope) => {
                let message = envelope_message(&envelope);
                tracing::error!("failed to load statistics: {message}");
                self.state = LoadState::Failed(message);
            },
            Err(err) => {
                tracing::error!("error loading statistics: {err}");
                self.state = LoadState::Failed(err.to_string());
            },
        }
        self.stats.as_ref()
    }
}
