use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error, info};

use super::view_model::{DashboardViewModel, LoadState};
use crate::client::{AttendanceBackend, BackendError};
use crate::export::{self, ExportError, SpreadsheetFile};
use crate::stats::time_window::{AllowedTimeWindow, WindowError};
use crate::utils::timestamp::ViewerZone;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("allowed time is misconfigured: {0}")]
    Window(#[from] WindowError),
}

/// Fetches the allowed-time configuration and turns it into minute bounds.
///
/// Anything that classifies attendance has to await this first.
pub async fn fetch_allowed_window(
    backend: &dyn AttendanceBackend,
) -> Result<AllowedTimeWindow, DashboardError> {
    let allowed = backend.allowed_time().await?;
    let window = AllowedTimeWindow::from_config(&allowed)?;
    debug!(
        start = window.start_minute,
        end = window.end_minute,
        "Allowed time window loaded"
    );
    Ok(window)
}

/// Drives one user's dashboard from fetch to view-model.
///
/// `Idle -> Loading -> Ready | Error`. A failed load leaves the previous
/// view-model in place.
pub struct DashboardPresenter {
    backend: Arc<dyn AttendanceBackend>,
    zone: ViewerZone,
    state: LoadState,
    view_model: DashboardViewModel,
}

impl DashboardPresenter {
    pub fn new(backend: Arc<dyn AttendanceBackend>, zone: ViewerZone) -> Self {
        Self {
            backend,
            zone,
            state: LoadState::Idle,
            view_model: DashboardViewModel::default(),
        }
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn view_model(&self) -> &DashboardViewModel {
        &self.view_model
    }

    pub fn into_view_model(self) -> DashboardViewModel {
        self.view_model
    }

    pub async fn initialize(&mut self, user_id: &str) -> LoadState {
        self.state = LoadState::Loading;

        self.state = match self.load(user_id).await {
            Ok(view_model) => {
                info!(user_id, "Dashboard ready");
                self.view_model = view_model;
                LoadState::Ready
            }
            Err(e) => {
                error!(error = %e, user_id, "Dashboard load failed");
                LoadState::Error
            }
        };

        self.state
    }

    /// Status, streak and chart only count records whose `employee_id` is
    /// `user_id`; the backend returns every employee's attendance.
    async fn load(&self, user_id: &str) -> Result<DashboardViewModel, DashboardError> {
        let window = fetch_allowed_window(self.backend.as_ref()).await?;

        let (records, time_in_out) = futures::try_join!(
            self.backend.attendance_records(),
            self.backend.time_in_and_out(user_id),
        )?;

        let mine: Vec<_> = records
            .into_iter()
            .filter(|r| r.belongs_to(user_id))
            .collect();

        Ok(DashboardViewModel::build(
            &mine,
            &window,
            &time_in_out,
            &self.zone,
        ))
    }

    pub fn export_to_spreadsheet(
        &self,
        view_model: &DashboardViewModel,
    ) -> Result<SpreadsheetFile, ExportError> {
        export::export_weekly(view_model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fake::{FakeBackend, record};
    use crate::model::time_record::{AllowedTimeConfig, TimeInOutRecord};

    fn utc() -> ViewerZone {
        ViewerZone::Fixed(chrono::FixedOffset::east_opt(0).unwrap())
    }

    fn presenter(backend: FakeBackend) -> (Arc<FakeBackend>, DashboardPresenter) {
        let backend = Arc::new(backend);
        let presenter = DashboardPresenter::new(backend.clone(), utc());
        (backend, presenter)
    }

    #[actix_web::test]
    async fn loads_the_users_dashboard() {
        let mut backend = FakeBackend::with_records(vec![
            record("7", "2024-05-06T08:05:00Z", "Present"),
            record("7", "2024-05-07T08:10:00Z", "Present"),
            record("7", "2024-05-08T07:00:00Z", "Absent"),
            record("9", "2024-05-06T09:00:00Z", "Sick Leave"),
            record("9", "2024-05-07T09:00:00Z", "Sick Leave"),
            record("9", "2024-05-08T09:00:00Z", "Sick Leave"),
        ]);
        backend.time_in_out = Some(TimeInOutRecord {
            formatted_item: Some("6h 30m".into()),
            ..TimeInOutRecord::default()
        });
        let (_, mut presenter) = presenter(backend);

        assert_eq!(presenter.state(), LoadState::Idle);
        assert_eq!(presenter.initialize("7").await, LoadState::Ready);

        let vm = presenter.view_model();
        assert_eq!(vm.present, vec![1, 1, 0, 0, 0]);
        assert_eq!(vm.absent, vec![0, 0, 1, 0, 0]);
        assert_eq!(vm.frequent_status, "Present");
        assert_eq!(vm.longest_streak, "2 days");
        assert_eq!(vm.total_time, "6h 30m");
    }

    #[actix_web::test]
    async fn fetches_the_window_before_attendance() {
        let (backend, mut presenter) = presenter(FakeBackend::default());
        presenter.initialize("7").await;

        let calls = backend.calls();
        assert_eq!(calls.first().map(String::as_str), Some("allowed_time"));
        assert!(calls.contains(&"attendance_records".to_string()));
        assert!(calls.contains(&"time_in_and_out 7".to_string()));
    }

    #[actix_web::test]
    async fn window_failure_keeps_placeholders_and_skips_attendance() {
        let (backend, mut presenter) = presenter(FakeBackend {
            allowed: None,
            ..FakeBackend::default()
        });

        assert_eq!(presenter.initialize("7").await, LoadState::Error);
        assert_eq!(presenter.view_model(), &DashboardViewModel::default());
        assert_eq!(backend.calls(), vec!["allowed_time".to_string()]);
    }

    #[actix_web::test]
    async fn attendance_failure_discards_partial_data() {
        let (_, mut presenter) = presenter(FakeBackend {
            records: None,
            ..FakeBackend::default()
        });

        assert_eq!(presenter.initialize("7").await, LoadState::Error);
        assert_eq!(presenter.view_model().frequent_status, "Not configured");
        assert!(!presenter.view_model().has_chart_data());
    }

    #[actix_web::test]
    async fn malformed_window_is_a_load_error() {
        let (_, mut presenter) = presenter(FakeBackend {
            allowed: Some(AllowedTimeConfig {
                start_time: "eight".into(),
                end_time: "05:00 PM".into(),
            }),
            ..FakeBackend::default()
        });

        assert_eq!(presenter.initialize("7").await, LoadState::Error);
    }

    #[actix_web::test]
    async fn failed_reload_keeps_the_previous_view_model() {
        let (_, mut presenter) = presenter(FakeBackend::with_records(vec![record(
            "7",
            "2024-05-06T08:05:00Z",
            "Present",
        )]));
        presenter.initialize("7").await;
        let loaded = presenter.view_model().clone();

        presenter.backend = Arc::new(FakeBackend {
            allowed: None,
            ..FakeBackend::default()
        });
        assert_eq!(presenter.initialize("7").await, LoadState::Error);
        assert_eq!(presenter.view_model(), &loaded);
    }

    #[actix_web::test]
    async fn exports_the_loaded_view_model() {
        let (_, mut presenter) = presenter(FakeBackend::default());
        presenter.initialize("7").await;

        let file = presenter
            .export_to_spreadsheet(presenter.view_model())
            .unwrap();
        assert_eq!(file.file_name, "WeeklyAttendance.xlsx");
        assert!(!file.bytes.is_empty());
    }
}
