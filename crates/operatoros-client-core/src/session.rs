use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

use serde::Serialize;

use crate::api::{ApiError, ConversationId, OperatorApi, RatingSubmission};
use crate::config::ClientConfig;
use crate::form::{ChatForm, GoalForm, ValidationError};
use crate::history::{HistoryEntry, HistoryStorage, HistoryStore};
use crate::markdown::format_ai_response;
use crate::notify::{Notification, NotificationCenter, Severity};
use crate::rating::RatingControl;
use crate::search::{DebounceTicket, Debouncer};
use crate::upload::{SelectedFile, UploadError, UploadGuard, UploadSummary};

pub const CHAT_SUCCESS_MESSAGE: &str = "AI response generated successfully!";
pub const CHAT_FAILURE_MESSAGE: &str = "An error occurred while processing your request.";
pub const GOAL_SUCCESS_MESSAGE: &str = "Goal created successfully!";
pub const GOAL_FAILURE_MESSAGE: &str = "Error creating goal. Please try again.";
pub const RATING_SUCCESS_MESSAGE: &str = "Thank you for your feedback!";
pub const RATING_FAILURE_MESSAGE: &str = "Error saving rating";
pub const HISTORY_CLEARED_MESSAGE: &str = "History cleared";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Chat,
    Goal,
}

impl FormKind {
    #[must_use]
    pub fn busy_label(self) -> &'static str {
        match self {
            Self::Chat => "Thinking...",
            Self::Goal => "Creating...",
        }
    }

    #[must_use]
    pub fn idle_label(self) -> &'static str {
        match self {
            Self::Chat => "Send",
            Self::Goal => "Create Goal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentUser {
    pub name: String,
    pub authenticated: bool,
}

impl CurrentUser {
    /// Derived from the navbar dropdown toggle's text, if the page has one.
    #[must_use]
    pub fn from_nav_label(label: Option<&str>) -> Option<Self> {
        label.map(|label| Self {
            name: label.trim().to_string(),
            authenticated: true,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatResponseView {
    pub html: String,
    pub provider: String,
    pub conversation_id: Option<ConversationId>,
}

/// DOM capabilities the session needs. The wasm shell implements this
/// against `web-sys`; tests record the calls.
pub trait PageSurface {
    fn show_notification(&self, notification: &Notification);
    fn set_form_busy(&self, form: FormKind, busy: bool);
    fn hide_chat_response(&self);
    fn render_chat_response(&self, view: &ChatResponseView);
    /// Binds the star row to `conversation_id` and returns how many stars it has.
    fn bind_rating(&self, conversation_id: &ConversationId) -> usize;
    fn paint_rating(&self, highlights: &[bool]);
    fn clear_prompt_input(&self);
    fn close_goal_modal(&self);
    fn schedule_reload(&self, delay: Duration);
}

/// Puts a submit control into its busy state and restores it on drop, so
/// every exit path of a submission re-enables the control.
pub struct BusyGuard<'a, P: PageSurface + ?Sized> {
    page: &'a P,
    form: FormKind,
}

impl<'a, P: PageSurface + ?Sized> BusyGuard<'a, P> {
    pub fn engage(page: &'a P, form: FormKind) -> Self {
        page.set_form_busy(form, true);
        Self { page, form }
    }
}

impl<P: PageSurface + ?Sized> Drop for BusyGuard<'_, P> {
    fn drop(&mut self) {
        self.page.set_form_busy(self.form, false);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatOutcome {
    Answered(ChatResponseView),
    Rejected(String),
    Failed(ApiError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoalOutcome {
    Created,
    Invalid(ValidationError),
    Failed(ApiError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RatingOutcome {
    Saved,
    Rejected(Option<String>),
    Failed(ApiError),
}

/// Page-lifetime client state. Created at boot, mutated only through
/// [`ClientSession`].
#[derive(Debug)]
pub struct ClientState<S> {
    history: HistoryStore<S>,
    notifications: NotificationCenter,
    rating: Option<RatingControl>,
    current_user: Option<CurrentUser>,
    search: Debouncer,
    /// One debouncer per `.auto-save` field, keyed by field name.
    autosave: HashMap<String, Debouncer>,
    autosave_quiet_period: Duration,
    upload_guard: UploadGuard,
}

impl<S: HistoryStorage> ClientState<S> {
    pub fn new(config: &ClientConfig, storage: S, current_user: Option<CurrentUser>) -> Self {
        Self {
            history: HistoryStore::open(
                storage,
                config.history_storage_key.clone(),
                config.history_limit,
            ),
            notifications: NotificationCenter::new(config.toast_ttl()),
            rating: None,
            current_user,
            search: Debouncer::new(config.search_debounce()),
            autosave: HashMap::new(),
            autosave_quiet_period: config.autosave_debounce(),
            upload_guard: UploadGuard::new(config.max_upload_bytes),
        }
    }
}

/// Client state plus the page and API it drives.
///
/// Async methods never hold a `RefCell` borrow across an await, so handlers
/// that fire while a request is in flight can still touch the state.
pub struct ClientSession<A, P, S> {
    config: ClientConfig,
    api: A,
    page: P,
    state: RefCell<ClientState<S>>,
}

impl<A, P, S> ClientSession<A, P, S>
where
    A: OperatorApi,
    P: PageSurface,
    S: HistoryStorage,
{
    pub fn new(config: ClientConfig, api: A, page: P, state: ClientState<S>) -> Self {
        Self {
            config,
            api,
            page,
            state: RefCell::new(state),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[must_use]
    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn notify(&self, message: impl Into<String>, severity: Severity) -> Notification {
        let notification = self.state.borrow_mut().notifications.show(message, severity);
        self.page.show_notification(&notification);
        notification
    }

    pub fn dismiss_notification(&self, id: u64) -> bool {
        self.state.borrow_mut().notifications.dismiss(id)
    }

    pub fn expire_notification(&self, id: u64) -> bool {
        self.state.borrow_mut().notifications.expire(id)
    }

    pub async fn submit_chat(&self, form: ChatForm) -> ChatOutcome {
        let _busy = BusyGuard::engage(&self.page, FormKind::Chat);
        self.page.hide_chat_response();

        let reply = match self.api.ai_chat(&form).await {
            Ok(reply) => reply,
            Err(error) => {
                tracing::warn!(%error, "ai chat request failed");
                self.notify(CHAT_FAILURE_MESSAGE, Severity::Danger);
                return ChatOutcome::Failed(error);
            }
        };

        if !reply.success {
            let message = format!("Error: {}", reply.error_message());
            self.notify(message.clone(), Severity::Danger);
            return ChatOutcome::Rejected(message);
        }

        let view = ChatResponseView {
            html: format_ai_response(&reply.response),
            provider: reply.provider_label().to_string(),
            conversation_id: reply.conversation_id.clone(),
        };
        self.page.render_chat_response(&view);
        if let Some(conversation_id) = view.conversation_id.as_ref() {
            let star_count = self.page.bind_rating(conversation_id);
            self.state.borrow_mut().rating =
                Some(RatingControl::new(conversation_id.clone(), star_count));
        }
        self.record_history(form.prompt(), &reply.response);
        self.page.clear_prompt_input();
        self.notify(CHAT_SUCCESS_MESSAGE, Severity::Success);
        ChatOutcome::Answered(view)
    }

    pub async fn submit_goal(&self, form: GoalForm) -> GoalOutcome {
        if let Err(error) = form.validate() {
            self.notify(error.to_string(), Severity::Warning);
            return GoalOutcome::Invalid(error);
        }

        let _busy = BusyGuard::engage(&self.page, FormKind::Goal);
        match self.api.create_goal(&form).await {
            Ok(()) => {
                self.notify(GOAL_SUCCESS_MESSAGE, Severity::Success);
                self.page.close_goal_modal();
                self.page.schedule_reload(self.config.goal_reload_delay());
                GoalOutcome::Created
            }
            Err(error) => {
                tracing::warn!(%error, "goal creation failed");
                self.notify(GOAL_FAILURE_MESSAGE, Severity::Danger);
                GoalOutcome::Failed(error)
            }
        }
    }

    pub fn hover_star(&self, index: usize) {
        let highlights = {
            let mut state = self.state.borrow_mut();
            let Some(rating) = state.rating.as_mut() else {
                return;
            };
            rating.hover(index);
            rating.highlights()
        };
        self.page.paint_rating(&highlights);
    }

    pub fn leave_rating(&self) {
        let highlights = {
            let mut state = self.state.borrow_mut();
            let Some(rating) = state.rating.as_mut() else {
                return;
            };
            rating.leave();
            rating.highlights()
        };
        self.page.paint_rating(&highlights);
    }

    pub async fn click_star(&self, index: usize) -> Option<RatingOutcome> {
        let (submission, highlights) = {
            let mut state = self.state.borrow_mut();
            let rating = state.rating.as_mut()?;
            let submission = rating.click(index)?;
            (submission, rating.highlights())
        };
        self.page.paint_rating(&highlights);
        Some(self.send_rating(&submission).await)
    }

    pub async fn rate_response(&self, conversation_id: ConversationId, rating: u8) -> RatingOutcome {
        self.send_rating(&RatingSubmission {
            conversation_id,
            rating,
        })
        .await
    }

    async fn send_rating(&self, submission: &RatingSubmission) -> RatingOutcome {
        match self.api.rate_response(submission).await {
            Ok(reply) if reply.success => {
                self.notify(RATING_SUCCESS_MESSAGE, Severity::Success);
                RatingOutcome::Saved
            }
            Ok(reply) => {
                self.notify(RATING_FAILURE_MESSAGE, Severity::Warning);
                RatingOutcome::Rejected(reply.error)
            }
            Err(error) => {
                tracing::warn!(%error, conversation_id = %submission.conversation_id, "rating request failed");
                self.notify(RATING_FAILURE_MESSAGE, Severity::Danger);
                RatingOutcome::Failed(error)
            }
        }
    }

    pub fn clear_history(&self) {
        let cleared = self.state.borrow_mut().history.clear();
        if let Err(error) = cleared {
            tracing::warn!(%error, "failed to clear persisted history");
        }
        self.notify(HISTORY_CLEARED_MESSAGE, Severity::Info);
    }

    #[must_use]
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.state.borrow().history.entries().cloned().collect()
    }

    #[must_use]
    pub fn persisted_history(&self) -> Vec<HistoryEntry> {
        self.state.borrow().history.load()
    }

    pub fn check_upload(&self, file: &SelectedFile<'_>) -> Result<UploadSummary, UploadError> {
        let checked = self.state.borrow().upload_guard.check(file);
        if let Err(error) = &checked {
            self.notify(error.to_string(), Severity::Warning);
        }
        checked
    }

    pub fn schedule_search(&self) -> DebounceTicket {
        self.state.borrow_mut().search.schedule()
    }

    pub fn settle_search(&self, ticket: DebounceTicket) -> bool {
        self.state.borrow_mut().search.settle(ticket)
    }

    /// Edits to different fields never cancel each other's pending save.
    pub fn schedule_autosave(&self, field: &str) -> DebounceTicket {
        let mut state = self.state.borrow_mut();
        let quiet_period = state.autosave_quiet_period;
        state
            .autosave
            .entry(field.to_string())
            .or_insert_with(|| Debouncer::new(quiet_period))
            .schedule()
    }

    pub fn settle_autosave(&self, field: &str, ticket: DebounceTicket) -> bool {
        self.state
            .borrow_mut()
            .autosave
            .get_mut(field)
            .is_some_and(|debouncer| debouncer.settle(ticket))
    }

    #[must_use]
    pub fn current_user(&self) -> Option<CurrentUser> {
        self.state.borrow().current_user.clone()
    }

    fn record_history(&self, prompt: &str, response: &str) {
        let appended = self.state.borrow_mut().history.append(prompt, response);
        if let Err(error) = appended {
            tracing::warn!(%error, "failed to persist response history");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;

    use async_trait::async_trait;
    use futures::executor::block_on;

    use super::*;
    use crate::api::{ChatReply, RatingReply, decode_json};
    use crate::form::FormFields;
    use crate::history::MemoryStorage;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum PageEvent {
        Toast(Severity, String),
        Busy(FormKind, bool),
        HideResponse,
        RenderResponse(String),
        Stars(Vec<bool>),
        ClearPrompt,
        CloseGoalModal,
        Reload(Duration),
    }

    #[derive(Default)]
    struct RecordingPage {
        events: RefCell<Vec<PageEvent>>,
    }

    impl RecordingPage {
        fn toasts(&self) -> Vec<(Severity, String)> {
            self.events
                .borrow()
                .iter()
                .filter_map(|event| match event {
                    PageEvent::Toast(severity, message) => Some((*severity, message.clone())),
                    _ => None,
                })
                .collect()
        }

        fn last_busy(&self, form: FormKind) -> Option<bool> {
            self.events.borrow().iter().rev().find_map(|event| match event {
                PageEvent::Busy(kind, busy) if *kind == form => Some(*busy),
                _ => None,
            })
        }
    }

    impl PageSurface for RecordingPage {
        fn show_notification(&self, notification: &Notification) {
            self.events.borrow_mut().push(PageEvent::Toast(
                notification.severity,
                notification.message.clone(),
            ));
        }

        fn set_form_busy(&self, form: FormKind, busy: bool) {
            self.events.borrow_mut().push(PageEvent::Busy(form, busy));
        }

        fn hide_chat_response(&self) {
            self.events.borrow_mut().push(PageEvent::HideResponse);
        }

        fn render_chat_response(&self, view: &ChatResponseView) {
            self.events
                .borrow_mut()
                .push(PageEvent::RenderResponse(view.html.clone()));
        }

        fn bind_rating(&self, _conversation_id: &ConversationId) -> usize {
            5
        }

        fn paint_rating(&self, highlights: &[bool]) {
            self.events
                .borrow_mut()
                .push(PageEvent::Stars(highlights.to_vec()));
        }

        fn clear_prompt_input(&self) {
            self.events.borrow_mut().push(PageEvent::ClearPrompt);
        }

        fn close_goal_modal(&self) {
            self.events.borrow_mut().push(PageEvent::CloseGoalModal);
        }

        fn schedule_reload(&self, delay: Duration) {
            self.events.borrow_mut().push(PageEvent::Reload(delay));
        }
    }

    #[derive(Default)]
    struct ScriptedApi {
        chat_replies: RefCell<VecDeque<Result<ChatReply, ApiError>>>,
        goal_replies: RefCell<VecDeque<Result<(), ApiError>>>,
        rating_replies: RefCell<VecDeque<Result<RatingReply, ApiError>>>,
        calls: Cell<usize>,
        ratings: RefCell<Vec<RatingSubmission>>,
    }

    #[async_trait(?Send)]
    impl OperatorApi for ScriptedApi {
        async fn ai_chat(&self, _form: &ChatForm) -> Result<ChatReply, ApiError> {
            self.calls.set(self.calls.get() + 1);
            self.chat_replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(ApiError::Network("no scripted reply".to_string())))
        }

        async fn create_goal(&self, _form: &GoalForm) -> Result<(), ApiError> {
            self.calls.set(self.calls.get() + 1);
            self.goal_replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(ApiError::Network("no scripted reply".to_string())))
        }

        async fn rate_response(
            &self,
            submission: &RatingSubmission,
        ) -> Result<RatingReply, ApiError> {
            self.calls.set(self.calls.get() + 1);
            self.ratings.borrow_mut().push(submission.clone());
            self.rating_replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(ApiError::Network("no scripted reply".to_string())))
        }
    }

    type TestSession = ClientSession<ScriptedApi, RecordingPage, MemoryStorage>;

    fn session(api: ScriptedApi) -> TestSession {
        let config = ClientConfig::default();
        let state = ClientState::new(&config, MemoryStorage::new(), None);
        ClientSession::new(config, api, RecordingPage::default(), state)
    }

    fn chat_form(prompt: &str) -> ChatForm {
        ChatForm::new(FormFields::new().with("prompt", prompt).with("provider", "auto"))
    }

    fn ok_chat() -> ChatReply {
        decode_json(
            r#"{"success":true,"response":"**Done**","provider":"claude","conversation_id":9}"#,
        )
        .expect("reply")
    }

    #[test]
    fn successful_chat_renders_records_and_restores_button() {
        let api = ScriptedApi::default();
        api.chat_replies.borrow_mut().push_back(Ok(ok_chat()));
        let session = session(api);

        let outcome = block_on(session.submit_chat(chat_form("grow revenue")));

        let ChatOutcome::Answered(view) = outcome else {
            panic!("expected an answer, got {outcome:?}");
        };
        assert_eq!(view.html, "<p><strong>Done</strong></p>");
        assert_eq!(view.provider, "claude");
        let events = session.page().events.borrow().clone();
        assert_eq!(events.first(), Some(&PageEvent::Busy(FormKind::Chat, true)));
        assert_eq!(events.get(1), Some(&PageEvent::HideResponse));
        assert!(events.contains(&PageEvent::ClearPrompt));
        assert_eq!(events.last(), Some(&PageEvent::Busy(FormKind::Chat, false)));
        assert_eq!(
            session.page().toasts(),
            vec![(Severity::Success, CHAT_SUCCESS_MESSAGE.to_string())]
        );
        let history = session.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].prompt, "grow revenue");
        assert_eq!(session.persisted_history(), history);
    }

    #[test]
    fn server_rejection_shows_error_and_skips_history() {
        let api = ScriptedApi::default();
        api.chat_replies.borrow_mut().push_back(Ok(
            decode_json(r#"{"error":"Prompt is required"}"#).expect("reply"),
        ));
        let session = session(api);

        let outcome = block_on(session.submit_chat(chat_form("")));

        assert_eq!(
            outcome,
            ChatOutcome::Rejected("Error: Prompt is required".to_string())
        );
        assert!(session.history().is_empty());
        assert_eq!(session.page().last_busy(FormKind::Chat), Some(false));
    }

    #[test]
    fn transport_failure_is_reported_and_button_restored() {
        let session = session(ScriptedApi::default());

        let outcome = block_on(session.submit_chat(chat_form("hello")));

        assert!(matches!(outcome, ChatOutcome::Failed(ApiError::Network(_))));
        assert_eq!(
            session.page().toasts(),
            vec![(Severity::Danger, CHAT_FAILURE_MESSAGE.to_string())]
        );
        assert_eq!(session.page().last_busy(FormKind::Chat), Some(false));
    }

    #[test]
    fn short_goal_title_never_reaches_the_network() {
        let session = session(ScriptedApi::default());
        let form = GoalForm::new(
            FormFields::new()
                .with("title", "ab")
                .with("description", "a perfectly fine description"),
        );

        let outcome = block_on(session.submit_goal(form));

        assert_eq!(outcome, GoalOutcome::Invalid(ValidationError::GoalTitleTooShort));
        assert_eq!(session.api.calls.get(), 0);
        assert_eq!(session.page().last_busy(FormKind::Goal), None);
        assert_eq!(
            session.page().toasts(),
            vec![(
                Severity::Warning,
                "Goal title must be at least 3 characters long".to_string()
            )]
        );
    }

    #[test]
    fn created_goal_closes_modal_and_schedules_reload() {
        let api = ScriptedApi::default();
        api.goal_replies.borrow_mut().push_back(Ok(()));
        let session = session(api);
        let form = GoalForm::new(
            FormFields::new()
                .with("title", "Launch beta")
                .with("description", "Ship the beta to ten customers"),
        );

        let outcome = block_on(session.submit_goal(form));

        assert_eq!(outcome, GoalOutcome::Created);
        let events = session.page().events.borrow().clone();
        assert!(events.contains(&PageEvent::CloseGoalModal));
        assert!(events.contains(&PageEvent::Reload(Duration::from_secs(1))));
        assert_eq!(events.last(), Some(&PageEvent::Busy(FormKind::Goal, false)));
    }

    #[test]
    fn failed_goal_creation_shows_danger_toast() {
        let api = ScriptedApi::default();
        api.goal_replies
            .borrow_mut()
            .push_back(Err(ApiError::Http { status: 500 }));
        let session = session(api);
        let form = GoalForm::new(
            FormFields::new()
                .with("title", "Launch beta")
                .with("description", "Ship the beta to ten customers"),
        );

        let outcome = block_on(session.submit_goal(form));

        assert_eq!(outcome, GoalOutcome::Failed(ApiError::Http { status: 500 }));
        assert_eq!(
            session.page().toasts(),
            vec![(Severity::Danger, GOAL_FAILURE_MESSAGE.to_string())]
        );
        assert_eq!(session.page().last_busy(FormKind::Goal), Some(false));
    }

    #[test]
    fn star_click_posts_rating_and_leave_clears_highlight() {
        let api = ScriptedApi::default();
        api.chat_replies.borrow_mut().push_back(Ok(ok_chat()));
        api.rating_replies.borrow_mut().push_back(Ok(RatingReply {
            success: true,
            error: None,
        }));
        let session = session(api);
        let _ = block_on(session.submit_chat(chat_form("rate me")));

        session.hover_star(1);
        let outcome = block_on(session.click_star(2));
        session.leave_rating();

        assert_eq!(outcome, Some(RatingOutcome::Saved));
        let submitted = session.api.ratings.borrow().clone();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].rating, 3);
        assert_eq!(submitted[0].conversation_id.as_str(), "9");
        let events = session.page().events.borrow().clone();
        assert_eq!(events.last(), Some(&PageEvent::Stars(vec![false; 5])));
    }

    #[test]
    fn stars_do_nothing_before_a_response_is_rendered() {
        let session = session(ScriptedApi::default());
        session.hover_star(0);
        assert_eq!(block_on(session.click_star(0)), None);
        assert!(session.page().events.borrow().is_empty());
    }

    #[test]
    fn rejected_rating_warns() {
        let api = ScriptedApi::default();
        api.rating_replies.borrow_mut().push_back(Ok(RatingReply {
            success: false,
            error: Some("Conversation not found".to_string()),
        }));
        let session = session(api);

        let outcome = block_on(session.rate_response(ConversationId::new("404"), 5));

        assert_eq!(
            outcome,
            RatingOutcome::Rejected(Some("Conversation not found".to_string()))
        );
        assert_eq!(
            session.page().toasts(),
            vec![(Severity::Warning, RATING_FAILURE_MESSAGE.to_string())]
        );
    }

    #[test]
    fn clear_history_empties_state_and_confirms() {
        let api = ScriptedApi::default();
        api.chat_replies.borrow_mut().push_back(Ok(ok_chat()));
        let session = session(api);
        let _ = block_on(session.submit_chat(chat_form("keep me")));

        session.clear_history();

        assert!(session.history().is_empty());
        assert!(session.persisted_history().is_empty());
        assert_eq!(
            session.page().toasts().last(),
            Some(&(Severity::Info, HISTORY_CLEARED_MESSAGE.to_string()))
        );
    }

    #[test]
    fn rejected_upload_warns_with_reason() {
        let session = session(ScriptedApi::default());
        let error = session
            .check_upload(&SelectedFile {
                name: "huge.csv",
                mime_type: "text/csv",
                size: 11 * 1024 * 1024,
            })
            .expect_err("expected rejection");

        assert!(matches!(error, UploadError::TooLarge { .. }));
        assert_eq!(
            session.page().toasts(),
            vec![(Severity::Warning, "File size must be less than 10MB".to_string())]
        );
    }

    #[test]
    fn search_burst_settles_once() {
        let session = session(ScriptedApi::default());
        let tickets: Vec<_> = (0..4).map(|_| session.schedule_search()).collect();
        let passes = tickets
            .into_iter()
            .filter(|ticket| session.settle_search(*ticket))
            .count();
        assert_eq!(passes, 1);
    }

    #[test]
    fn auto_save_fields_settle_independently() {
        let session = session(ScriptedApi::default());
        let first_title = session.schedule_autosave("title");
        let title = session.schedule_autosave("title");
        let notes = session.schedule_autosave("notes");

        assert!(!session.settle_autosave("title", first_title));
        assert!(session.settle_autosave("title", title));
        assert!(session.settle_autosave("notes", notes));
        assert!(!session.settle_autosave("notes", notes));
        assert!(!session.settle_autosave("unknown", notes));
    }

    #[test]
    fn rating_transport_failure_shows_danger_toast() {
        let api = ScriptedApi::default();
        api.rating_replies
            .borrow_mut()
            .push_back(Err(ApiError::Network("connection reset".to_string())));
        let session = session(api);

        let outcome = block_on(session.rate_response(ConversationId::new("9"), 4));

        assert_eq!(
            outcome,
            RatingOutcome::Failed(ApiError::Network("connection reset".to_string()))
        );
        assert_eq!(
            session.page().toasts(),
            vec![(Severity::Danger, RATING_FAILURE_MESSAGE.to_string())]
        );
        assert_eq!(session.api.ratings.borrow()[0].rating, 4);
    }

    #[test]
    fn expiry_after_dismissal_is_harmless() {
        let session = session(ScriptedApi::default());
        let toast = session.notify("hi", Severity::Info);
        assert!(session.dismiss_notification(toast.id));
        assert!(!session.expire_notification(toast.id));
    }

    #[test]
    fn current_user_comes_from_nav_label() {
        let user = CurrentUser::from_nav_label(Some("  Ada Lovelace \n")).expect("user");
        assert_eq!(user.name, "Ada Lovelace");
        assert!(user.authenticated);
        assert_eq!(CurrentUser::from_nav_label(None), None);
    }
}
