pub(crate) const CONFIG_GLOBAL: &str = "__OPERATOROS_CONFIG__";
pub(crate) const SURFACE_GLOBAL: &str = "OperatorOS";

pub(crate) const CHAT_FORM_ID: &str = "aiChatForm";
pub(crate) const GOAL_FORM_ID: &str = "createGoalForm";
pub(crate) const GOAL_MODAL_ID: &str = "createGoalModal";
pub(crate) const RESPONSE_PANEL_ID: &str = "aiResponse";
pub(crate) const RESPONSE_CONTENT_ID: &str = "responseContent";
pub(crate) const RESPONSE_PROVIDER_ID: &str = "responseProvider";
pub(crate) const RATING_STARS_ID: &str = "ratingStars";
pub(crate) const NOTIFICATION_CONTAINER_ID: &str = "notificationContainer";

pub(crate) const SUBMIT_BUTTON_SELECTOR: &str = "button[type=\"submit\"]";
pub(crate) const PROMPT_INPUT_SELECTOR: &str = "textarea[name=\"prompt\"]";
pub(crate) const RATING_STAR_SELECTOR: &str = "#ratingStars i";
pub(crate) const RATING_LIT_CLASS: &str = "text-warning";
pub(crate) const NAV_USER_SELECTOR: &str = ".navbar-nav .dropdown-toggle";
pub(crate) const NAV_LINK_SELECTOR: &str = ".nav-link";
pub(crate) const ANCHOR_LINK_SELECTOR: &str = "a[href^=\"#\"]";
pub(crate) const FILE_INPUT_SELECTOR: &str = "input[type=\"file\"]";
pub(crate) const SEARCH_INPUT_SELECTOR: &str = ".search-input";
pub(crate) const SEARCHABLE_SELECTOR: &str = ".searchable";
pub(crate) const AUTO_SAVE_SELECTOR: &str = ".auto-save";
pub(crate) const TIMESTAMP_SELECTOR: &str = "[data-timestamp]";
pub(crate) const TIMESTAMP_ATTRIBUTE: &str = "data-timestamp";
pub(crate) const NEEDS_VALIDATION_SELECTOR: &str = ".needs-validation";
pub(crate) const OPEN_MODAL_SELECTOR: &str = ".modal.show";
pub(crate) const TOOLTIP_SELECTOR: &str = "[data-bs-toggle=\"tooltip\"]";
pub(crate) const ANIMATE_ON_SCROLL_SELECTOR: &str = ".animate-on-scroll";

pub(crate) const HIDDEN_CLASS: &str = "d-none";
pub(crate) const FADE_IN_CLASS: &str = "fade-in";
pub(crate) const ACTIVE_CLASS: &str = "active";
pub(crate) const WAS_VALIDATED_CLASS: &str = "was-validated";

pub(crate) const TOAST_CONTAINER_CLASS: &str = "position-fixed top-0 end-0 p-3";
pub(crate) const TOAST_CONTAINER_Z_INDEX: &str = "9999";
pub(crate) const UPLOAD_SUMMARY_CLASS: &str = "alert alert-info mt-2";

pub(crate) const CLIPBOARD_SUCCESS_MESSAGE: &str = "Copied to clipboard!";
pub(crate) const CLIPBOARD_FAILURE_MESSAGE: &str = "Failed to copy to clipboard";
pub(crate) const ONLINE_MESSAGE: &str = "Connection restored";
pub(crate) const OFFLINE_MESSAGE: &str = "Connection lost. Some features may not work.";
