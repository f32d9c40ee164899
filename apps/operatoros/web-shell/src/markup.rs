use operatoros_client_core::Notification;
use operatoros_client_core::markdown::escape_html;
use operatoros_client_core::notify::TOAST_ID_PREFIX;
use operatoros_client_core::session::FormKind;
use operatoros_client_core::upload::UploadSummary;

/// Submit button content for a form, with its Font Awesome icon.
pub(crate) fn submit_label_html(form: FormKind, busy: bool) -> String {
    let icon = match (form, busy) {
        (_, true) => "fas fa-spinner fa-spin",
        (FormKind::Chat, false) => "fas fa-paper-plane",
        (FormKind::Goal, false) => "fas fa-plus",
    };
    let label = if busy {
        form.busy_label()
    } else {
        form.idle_label()
    };
    format!("<i class=\"{icon}\"></i> {label}")
}

pub(crate) fn toast_html(notification: &Notification) -> String {
    format!(
        "{}<button type=\"button\" class=\"btn-close\" data-bs-dismiss=\"alert\"></button>",
        escape_html(&notification.message)
    )
}

pub(crate) fn toast_id_from_element_id(element_id: &str) -> Option<u64> {
    element_id.strip_prefix(TOAST_ID_PREFIX)?.parse().ok()
}

pub(crate) fn upload_summary_html(summary: &UploadSummary) -> String {
    format!(
        "<i class=\"fas fa-file-csv\"></i> {}",
        escape_html(&summary.label())
    )
}

pub(crate) fn is_current_nav_link(href: Option<&str>, pathname: &str) -> bool {
    href.is_some_and(|href| href == pathname)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Shortcut {
    FocusSearch,
    CloseModals,
}

pub(crate) fn shortcut_for(key: &str, ctrl: bool, meta: bool) -> Option<Shortcut> {
    match key {
        "k" | "K" if ctrl || meta => Some(Shortcut::FocusSearch),
        "Escape" => Some(Shortcut::CloseModals),
        _ => None,
    }
}

/// Selector for an in-page anchor target, or `None` for a bare `#`.
pub(crate) fn anchor_target_selector(href: &str) -> Option<&str> {
    if href.len() > 1 && href.starts_with('#') {
        Some(href)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use operatoros_client_core::Severity;

    use super::*;

    #[test]
    fn submit_labels_swap_icon_while_busy() {
        assert_eq!(
            submit_label_html(FormKind::Chat, true),
            "<i class=\"fas fa-spinner fa-spin\"></i> Thinking..."
        );
        assert_eq!(
            submit_label_html(FormKind::Chat, false),
            "<i class=\"fas fa-paper-plane\"></i> Send"
        );
        assert_eq!(
            submit_label_html(FormKind::Goal, false),
            "<i class=\"fas fa-plus\"></i> Create Goal"
        );
    }

    #[test]
    fn toast_markup_escapes_message_and_round_trips_id() {
        let notification = Notification {
            id: 17,
            message: "Error: <b>boom</b>".to_string(),
            severity: Severity::Danger,
            ttl: Duration::from_secs(5),
        };
        assert!(toast_html(&notification).starts_with("Error: &lt;b&gt;boom&lt;/b&gt;<button"));
        assert_eq!(
            toast_id_from_element_id(&notification.element_id()),
            Some(17)
        );
        assert_eq!(toast_id_from_element_id("notificationContainer"), None);
    }

    #[test]
    fn upload_summary_uses_human_size() {
        let summary = UploadSummary {
            name: "q3.csv".to_string(),
            size: 2048,
        };
        assert_eq!(
            upload_summary_html(&summary),
            "<i class=\"fas fa-file-csv\"></i> Selected: q3.csv (2 KB)"
        );
    }

    #[test]
    fn shortcuts_need_modifier_for_search() {
        assert_eq!(shortcut_for("k", true, false), Some(Shortcut::FocusSearch));
        assert_eq!(shortcut_for("k", false, true), Some(Shortcut::FocusSearch));
        assert_eq!(shortcut_for("k", false, false), None);
        assert_eq!(shortcut_for("Escape", false, false), Some(Shortcut::CloseModals));
    }

    #[test]
    fn nav_and_anchor_matching() {
        assert!(is_current_nav_link(Some("/goals"), "/goals"));
        assert!(!is_current_nav_link(Some("/goals"), "/"));
        assert!(!is_current_nav_link(None, "/"));
        assert_eq!(anchor_target_selector("#pricing"), Some("#pricing"));
        assert_eq!(anchor_target_selector("#"), None);
    }
}
