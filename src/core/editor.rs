use crate::config::toml_config::DEFAULT_PRICING_FILE;
use crate::core::derive::{derive_edit, parse_cell_input};
use crate::core::store::{MatrixAction, MatrixStore};
use crate::domain::model::{format_price, Matrix, Term, Tier};
use crate::domain::ports::{Notifier, PricingApi};
use crate::utils::error::Result;
use std::fmt::Write;

pub const INVALID_INPUT_NOTICE: &str = "Only numbers allowed.";
pub const CANCEL_NOTICE: &str = "We reset your matrix table to the original matrix from API";
pub const CLEAR_NOTICE: &str = "We reset your matrix table to the empty matrix";

pub fn saved_notice(pricing_file: &str) -> String {
    format!("Successfully saved to {}", pricing_file)
}

/// The last button the user pressed; drives the notice under the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorMode {
    #[default]
    None,
    Edit,
    Save,
    Cancel,
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// Nothing fetched yet; only the fetch action is offered.
    Initial,
    Viewing,
    Editing,
}

/// 價格表編輯器
///
/// Holds two copies of the matrix: the store's current matrix, which every
/// edit replaces, and the original snapshot confirmed by the last fetch or
/// save, which cancel restores and every edit is derived from.
pub struct MatrixEditor<A: PricingApi, N: Notifier> {
    api: A,
    notifier: N,
    store: MatrixStore,
    original: Option<Matrix>,
    pricing_file: String,
    is_fetched: bool,
    is_edit_mode: bool,
    current_mode: EditorMode,
}

impl<A: PricingApi, N: Notifier> MatrixEditor<A, N> {
    pub fn new(api: A, notifier: N, initial_matrix: Option<Matrix>) -> Self {
        Self {
            api,
            notifier,
            store: MatrixStore::new(initial_matrix),
            original: None,
            pricing_file: DEFAULT_PRICING_FILE.to_string(),
            is_fetched: false,
            is_edit_mode: false,
            current_mode: EditorMode::None,
        }
    }

    /// File the server writes to; only used in the save notice.
    pub fn with_pricing_file(mut self, pricing_file: impl Into<String>) -> Self {
        self.pricing_file = pricing_file.into();
        self
    }

    pub fn matrix(&self) -> &Matrix {
        self.store.matrix()
    }

    pub fn original(&self) -> Option<&Matrix> {
        self.original.as_ref()
    }

    pub fn is_edit_mode(&self) -> bool {
        self.is_edit_mode
    }

    pub fn current_mode(&self) -> EditorMode {
        self.current_mode
    }

    pub fn view_state(&self) -> ViewState {
        match (self.is_fetched, self.is_edit_mode) {
            (false, _) => ViewState::Initial,
            (true, false) => ViewState::Viewing,
            (true, true) => ViewState::Editing,
        }
    }

    /// 從 API 取得最新價格表，並存為原始快照
    pub async fn fetch_data_from_api(&mut self) -> Result<()> {
        tracing::debug!("Fetching pricing matrix");
        let matrix = self.api.fetch_matrix().await.map_err(|e| {
            tracing::error!("❌ Error fetching data {}", e);
            e
        })?;

        self.original = Some(matrix);
        self.store.dispatch(MatrixAction::set_original(matrix));
        self.is_fetched = true;
        tracing::debug!("Pricing matrix fetched");
        Ok(())
    }

    /// Toggles edit mode.
    pub fn edit(&mut self) {
        self.is_edit_mode = !self.is_edit_mode;
        self.current_mode = EditorMode::Edit;
    }

    /// Applies a typed cell value. A value that is not a number, or that
    /// would derive a non-finite price, is reported to the user and leaves
    /// the matrix untouched.
    pub fn on_input_change(&mut self, term: Term, tier: Tier, raw: &str) -> Result<()> {
        let base = self.original.unwrap_or(*self.store.matrix());
        let derived = parse_cell_input(raw).and_then(|value| derive_edit(&base, term, tier, value));
        let next = match derived {
            Ok(next) => next,
            Err(e) => {
                self.notifier.notify(INVALID_INPUT_NOTICE);
                return Err(e);
            }
        };

        self.store.dispatch(MatrixAction::set(next));
        Ok(())
    }

    pub fn clear(&mut self) {
        self.is_edit_mode = true;
        self.current_mode = EditorMode::Clear;
        self.store.dispatch(MatrixAction::reset_to_empty());
    }

    pub fn cancel(&mut self) {
        self.is_edit_mode = false;
        self.current_mode = EditorMode::Cancel;
        // 尚未取得資料時沒有可還原的快照
        if let Some(original) = self.original {
            self.store.dispatch(MatrixAction::set_original(original));
        }
    }

    /// 儲存目前的價格表；成功後它就成為新的原始快照
    pub async fn save(&mut self) -> Result<()> {
        let matrix = *self.store.matrix();

        match self.api.save_matrix(&matrix).await {
            Ok(_) => {
                self.notifier.notify(&saved_notice(&self.pricing_file));
                self.is_edit_mode = false;
                self.current_mode = EditorMode::Save;
                self.original = Some(matrix);
                Ok(())
            }
            Err(e) => {
                tracing::error!("❌ Error saving data {}", e);
                Err(e)
            }
        }
    }

    pub fn notice(&self) -> Option<&'static str> {
        match self.current_mode {
            EditorMode::Cancel => Some(CANCEL_NOTICE),
            EditorMode::Clear => Some(CLEAR_NOTICE),
            _ => None,
        }
    }

    /// Actions offered in the current state.
    pub fn actions(&self) -> &'static [&'static str] {
        match self.view_state() {
            ViewState::Initial => &["fetch"],
            ViewState::Viewing => &["edit"],
            ViewState::Editing => &["save", "clear", "cancel"],
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();

        if self.view_state() == ViewState::Initial {
            let _ = writeln!(out, "Fetch data from API");
            let _ = writeln!(out, "actions: {}", self.actions().join(", "));
            return out;
        }

        let _ = write!(out, "{:<12}", "");
        for tier in Tier::ALL {
            let _ = write!(out, "{:>12}", tier.label());
        }
        out.push('\n');

        let matrix = self.store.matrix();
        for term in Term::ALL {
            let _ = write!(out, "{:<12}", term.label());
            for tier in Tier::ALL {
                let price = format_price(matrix.price(term, tier));
                let cell = if self.is_edit_mode {
                    format!("[{}]", price)
                } else {
                    price
                };
                let _ = write!(out, "{:>12}", cell);
            }
            out.push('\n');
        }

        if let Some(notice) = self.notice() {
            let _ = writeln!(out, "{}", notice);
        }
        let _ = writeln!(out, "actions: {}", self.actions().join(", "));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::TierPrices;
    use crate::utils::error::PricingError;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct MockApi {
        remote: Arc<Mutex<Option<Matrix>>>,
        saved: Arc<Mutex<Vec<Matrix>>>,
        fail_save: bool,
        calls: Arc<Mutex<usize>>,
    }

    impl MockApi {
        fn with_remote(matrix: Matrix) -> Self {
            Self {
                remote: Arc::new(Mutex::new(Some(matrix))),
                ..Self::default()
            }
        }

        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl PricingApi for MockApi {
        async fn fetch_matrix(&self) -> Result<Matrix> {
            *self.calls.lock().unwrap() += 1;
            self.remote
                .lock()
                .unwrap()
                .ok_or_else(|| PricingError::UnexpectedStatusError {
                    status: 503,
                    body: "unavailable".to_string(),
                })
        }

        async fn save_matrix(&self, matrix: &Matrix) -> Result<Matrix> {
            *self.calls.lock().unwrap() += 1;
            if self.fail_save {
                return Err(PricingError::UnexpectedStatusError {
                    status: 422,
                    body: "Error".to_string(),
                });
            }
            self.saved.lock().unwrap().push(*matrix);
            *self.remote.lock().unwrap() = Some(*matrix);
            Ok(*matrix)
        }
    }

    #[derive(Clone, Default)]
    struct RecordingNotifier {
        messages: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingNotifier {
        fn messages(&self) -> Vec<String> {
            self.messages.lock().unwrap().clone()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, message: &str) {
            self.messages.lock().unwrap().push(message.to_string());
        }
    }

    fn fetched_matrix() -> Matrix {
        Matrix {
            months_36: TierPrices::new(10.0, 20.0, 30.0),
            months_24: TierPrices::new(8.0, 16.0, 24.0),
            months_12: TierPrices::new(5.0, 10.0, 15.0),
        }
    }

    async fn fetched_editor() -> (MatrixEditor<MockApi, RecordingNotifier>, MockApi, RecordingNotifier) {
        let api = MockApi::with_remote(fetched_matrix());
        let notifier = RecordingNotifier::default();
        let mut editor = MatrixEditor::new(api.clone(), notifier.clone(), None);
        editor.fetch_data_from_api().await.unwrap();
        (editor, api, notifier)
    }

    #[tokio::test]
    async fn test_fetch_stores_original_and_current() {
        let (editor, _, _) = fetched_editor().await;

        assert_eq!(editor.view_state(), ViewState::Viewing);
        assert_eq!(editor.matrix(), &fetched_matrix());
        assert_eq!(editor.original(), Some(&fetched_matrix()));
    }

    #[tokio::test]
    async fn test_failed_fetch_stays_initial() {
        let mut editor = MatrixEditor::new(MockApi::default(), RecordingNotifier::default(), None);

        assert!(editor.fetch_data_from_api().await.is_err());
        assert_eq!(editor.view_state(), ViewState::Initial);
        assert_eq!(editor.original(), None);
        assert_eq!(editor.actions(), &["fetch"]);
    }

    #[tokio::test]
    async fn test_edit_toggles_mode() {
        let (mut editor, _, _) = fetched_editor().await;

        editor.edit();
        assert_eq!(editor.view_state(), ViewState::Editing);
        assert_eq!(editor.actions(), &["save", "clear", "cancel"]);

        editor.edit();
        assert_eq!(editor.view_state(), ViewState::Viewing);
    }

    #[tokio::test]
    async fn test_edit_then_cancel_restores_fetched_matrix() {
        let (mut editor, _, _) = fetched_editor().await;

        editor.edit();
        editor
            .on_input_change(Term::Months36, Tier::Lite, "15")
            .unwrap();

        let mut expected = fetched_matrix();
        expected.months_36 = TierPrices::new(15.0, 30.0, 45.0);
        assert_eq!(editor.matrix(), &expected);

        editor.cancel();
        assert_eq!(editor.matrix(), &fetched_matrix());
        assert_eq!(editor.view_state(), ViewState::Viewing);
        assert_eq!(editor.notice(), Some(CANCEL_NOTICE));
    }

    #[tokio::test]
    async fn test_edits_derive_from_snapshot() {
        let (mut editor, _, _) = fetched_editor().await;
        editor.edit();

        editor
            .on_input_change(Term::Months24, Tier::Standard, "17")
            .unwrap();
        editor
            .on_input_change(Term::Months24, Tier::Unlimited, "25")
            .unwrap();

        // 第二次編輯以原始快照為基準
        assert_eq!(editor.matrix().months_24, TierPrices::new(8.0, 16.0, 25.0));
    }

    #[tokio::test]
    async fn test_non_numeric_input_is_discarded() {
        let (mut editor, api, notifier) = fetched_editor().await;
        editor.edit();
        editor
            .on_input_change(Term::Months12, Tier::Lite, "7")
            .unwrap();
        let before = *editor.matrix();
        let calls_before = api.calls();

        let result = editor.on_input_change(Term::Months12, Tier::Standard, "abc");

        assert!(matches!(result, Err(PricingError::InvalidInputError { .. })));
        assert_eq!(editor.matrix(), &before);
        assert_eq!(notifier.messages(), vec![INVALID_INPUT_NOTICE]);
        assert_eq!(api.calls(), calls_before);
        assert!(editor.is_edit_mode());
    }

    #[tokio::test]
    async fn test_overflowing_lite_input_is_discarded() {
        let (mut editor, _, notifier) = fetched_editor().await;
        editor.edit();

        let result = editor.on_input_change(Term::Months36, Tier::Lite, "1e308");

        assert!(matches!(result, Err(PricingError::InvalidInputError { .. })));
        assert_eq!(editor.matrix(), &fetched_matrix());
        assert_eq!(notifier.messages(), vec![INVALID_INPUT_NOTICE]);
        assert!(!editor.render().contains("inf"));
    }

    #[tokio::test]
    async fn test_save_notice_names_pricing_file() {
        let notifier = RecordingNotifier::default();
        let mut editor = MatrixEditor::new(
            MockApi::with_remote(fetched_matrix()),
            notifier.clone(),
            None,
        )
        .with_pricing_file("data/pricing.json");
        editor.fetch_data_from_api().await.unwrap();
        editor.edit();

        editor.save().await.unwrap();
        assert_eq!(
            notifier.messages(),
            vec!["Successfully saved to data/pricing.json"]
        );
    }

    #[tokio::test]
    async fn test_empty_input_counts_as_zero() {
        let (mut editor, _, _) = fetched_editor().await;
        editor.edit();

        editor
            .on_input_change(Term::Months36, Tier::Lite, "")
            .unwrap();
        assert_eq!(editor.matrix().months_36, TierPrices::default());
    }

    #[tokio::test]
    async fn test_clear_zeroes_without_network() {
        let (mut editor, api, _) = fetched_editor().await;
        let calls_before = api.calls();

        editor.clear();

        assert_eq!(editor.matrix(), &Matrix::empty());
        assert_eq!(editor.view_state(), ViewState::Editing);
        assert_eq!(editor.original(), Some(&fetched_matrix()));
        assert_eq!(editor.notice(), Some(CLEAR_NOTICE));
        assert_eq!(api.calls(), calls_before);
    }

    #[tokio::test]
    async fn test_save_updates_snapshot() {
        let (mut editor, api, notifier) = fetched_editor().await;
        editor.edit();
        editor
            .on_input_change(Term::Months12, Tier::Lite, "6")
            .unwrap();
        let edited = *editor.matrix();

        editor.save().await.unwrap();

        assert_eq!(api.saved.lock().unwrap().as_slice(), &[edited]);
        assert_eq!(editor.view_state(), ViewState::Viewing);
        assert_eq!(editor.current_mode(), EditorMode::Save);
        assert_eq!(
            notifier.messages(),
            vec!["Successfully saved to public/pricing.json"]
        );

        // 儲存後取消，應還原為剛儲存的值
        editor.edit();
        editor
            .on_input_change(Term::Months36, Tier::Unlimited, "1")
            .unwrap();
        editor.cancel();
        assert_eq!(editor.matrix(), &edited);
    }

    #[tokio::test]
    async fn test_failed_save_keeps_editing() {
        let api = MockApi {
            fail_save: true,
            ..MockApi::with_remote(fetched_matrix())
        };
        let notifier = RecordingNotifier::default();
        let mut editor = MatrixEditor::new(api, notifier.clone(), None);
        editor.fetch_data_from_api().await.unwrap();
        editor.clear();

        assert!(editor.save().await.is_err());
        assert!(editor.is_edit_mode());
        assert_eq!(editor.original(), Some(&fetched_matrix()));
        assert!(notifier.messages().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_before_fetch_keeps_initial_matrix() {
        let mut editor = MatrixEditor::new(
            MockApi::default(),
            RecordingNotifier::default(),
            Some(fetched_matrix()),
        );

        editor.cancel();
        assert_eq!(editor.matrix(), &fetched_matrix());
        assert!(!editor.is_edit_mode());
    }

    #[tokio::test]
    async fn test_render_states() {
        let api = MockApi::with_remote(fetched_matrix());
        let mut editor = MatrixEditor::new(api, RecordingNotifier::default(), None);
        assert!(editor.render().starts_with("Fetch data from API"));

        editor.fetch_data_from_api().await.unwrap();
        let viewing = editor.render();
        assert!(viewing.contains("36 months"));
        assert!(viewing.contains("Unlimited"));
        assert!(viewing.contains("30"));
        assert!(!viewing.contains('['));
        assert!(viewing.ends_with("actions: edit\n"));

        editor.edit();
        let editing = editor.render();
        assert!(editing.contains("[30]"));
        assert!(editing.ends_with("actions: save, clear, cancel\n"));
    }
}
