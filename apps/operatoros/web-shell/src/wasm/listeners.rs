use super::*;

/// Keeps `closure` alive for the page lifetime once it is attached.
pub(super) fn listen(
    target: &web_sys::EventTarget,
    event: &str,
    handler: impl FnMut(web_sys::Event) + 'static,
) {
    let closure = EventHandler::new(handler);
    if target
        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        .is_err()
    {
        tracing::warn!(event, "failed to attach listener");
        return;
    }
    EVENT_HANDLERS.with(|handlers| handlers.borrow_mut().push(closure));
}

fn event_form(event: &web_sys::Event) -> Option<HtmlFormElement> {
    event.current_target()?.dyn_into::<HtmlFormElement>().ok()
}

fn event_target_element(event: &web_sys::Event) -> Option<Element> {
    event.target()?.dyn_into::<Element>().ok()
}

/// Attaches every page listener. Runs once per document; a session rebuilt
/// after a back-forward restore reuses them.
pub(super) fn wire_listeners() -> Result<usize, String> {
    if LISTENERS_WIRED.with(|wired| wired.replace(true)) {
        return Ok(EVENT_HANDLERS.with(|handlers| handlers.borrow().len()));
    }
    let window = web_sys::window().ok_or_else(|| "window is unavailable".to_string())?;
    let document = document()?;

    wire_chat_form();
    wire_goal_form();
    wire_rating_row();
    wire_file_inputs();
    wire_search_inputs();
    wire_auto_save_fields();
    wire_navigation();
    wire_form_validation();
    wire_keyboard_shortcuts(&document);
    wire_connectivity(&window);
    wire_page_lifecycle(&window, &document);

    Ok(EVENT_HANDLERS.with(|handlers| handlers.borrow().len()))
}

fn wire_chat_form() {
    let Some(form) = element_by_id(CHAT_FORM_ID) else {
        return;
    };
    listen(&form, "submit", |event| {
        event.prevent_default();
        let Some(form) = event_form(&event) else {
            return;
        };
        let fields = match collect_form_fields(&form) {
            Ok(fields) => fields,
            Err(error) => {
                tracing::warn!(%error, "chat form could not be read");
                return;
            }
        };
        let Some(session) = session() else {
            return;
        };
        spawn_local(async move {
            let _ = session.submit_chat(ChatForm::new(fields)).await;
        });
    });
}

fn wire_goal_form() {
    let Some(form) = element_by_id(GOAL_FORM_ID) else {
        return;
    };
    listen(&form, "submit", |event| {
        event.prevent_default();
        let Some(form) = event_form(&event) else {
            return;
        };
        let fields = match collect_form_fields(&form) {
            Ok(fields) => fields,
            Err(error) => {
                tracing::warn!(%error, "goal form could not be read");
                return;
            }
        };
        let Some(session) = session() else {
            return;
        };
        spawn_local(async move {
            let _ = session.submit_goal(GoalForm::new(fields)).await;
        });
    });
}

/// Delegated on the star row, so stars need no per-response listeners.
fn wire_rating_row() {
    let Some(row) = element_by_id(RATING_STARS_ID) else {
        return;
    };
    listen(&row, "mouseover", |event| {
        let Some(index) = event_target_element(&event).and_then(|target| rating_star_index(&target))
        else {
            return;
        };
        if let Some(session) = session() {
            session.hover_star(index);
        }
    });
    listen(&row, "click", |event| {
        let Some(index) = event_target_element(&event).and_then(|target| rating_star_index(&target))
        else {
            return;
        };
        let Some(session) = session() else {
            return;
        };
        spawn_local(async move {
            let _ = session.click_star(index).await;
        });
    });
    listen(&row, "mouseleave", |_| {
        if let Some(session) = session() {
            session.leave_rating();
        }
    });
}

fn wire_file_inputs() {
    for input in query_all(FILE_INPUT_SELECTOR) {
        listen(&input, "change", |event| {
            let Some(input) = event
                .current_target()
                .and_then(|target| target.dyn_into::<HtmlInputElement>().ok())
            else {
                return;
            };
            let Some(file) = input.files().and_then(|files| files.get(0)) else {
                return;
            };
            let Some(session) = session() else {
                return;
            };
            let name = file.name();
            let mime_type = file.type_();
            let selected = SelectedFile {
                name: &name,
                mime_type: &mime_type,
                size: file.size().max(0.0) as u64,
            };
            match session.check_upload(&selected) {
                Ok(summary) => {
                    if let Err(error) = show_upload_summary(&input, &upload_summary_html(&summary))
                    {
                        tracing::warn!(%error, "failed to render upload summary");
                    }
                }
                Err(_) => input.set_value(""),
            }
        });
    }
}

fn wire_search_inputs() {
    for input in query_all(SEARCH_INPUT_SELECTOR) {
        listen(&input, "input", |event| {
            let Some(query) = event
                .current_target()
                .and_then(|target| target.dyn_into::<HtmlInputElement>().ok())
                .map(|input| input.value())
            else {
                return;
            };
            let Some(session) = session() else {
                return;
            };
            let ticket = session.schedule_search();
            let quiet_period = session.config().search_debounce();
            spawn_local(async move {
                sleep(quiet_period).await;
                if session.settle_search(ticket) {
                    apply_search_filter(&query);
                }
            });
        });
    }
}

fn wire_auto_save_fields() {
    for field in query_all(AUTO_SAVE_SELECTOR) {
        listen(&field, "input", |event| {
            let Some(field) = event_target_element(&event) else {
                return;
            };
            let Some(session) = session() else {
                return;
            };
            let name = field.get_attribute("name").unwrap_or_default();
            let key = if name.is_empty() { field.id() } else { name.clone() };
            let value = js_sys::Reflect::get(&field, &JsValue::from_str("value"))
                .ok()
                .and_then(|value| value.as_string())
                .unwrap_or_default();
            let ticket = session.schedule_autosave(&key);
            let quiet_period = session.config().autosave_debounce();
            spawn_local(async move {
                sleep(quiet_period).await;
                if session.settle_autosave(&key, ticket) {
                    tracing::info!(field = %name, %value, "auto-saving");
                }
            });
        });
    }
}

fn wire_navigation() {
    let pathname = current_pathname();
    for link in query_all(NAV_LINK_SELECTOR) {
        if is_current_nav_link(link.get_attribute("href").as_deref(), &pathname) {
            let _ = link.class_list().add_1(ACTIVE_CLASS);
        }
    }

    for anchor in query_all(ANCHOR_LINK_SELECTOR) {
        listen(&anchor, "click", |event| {
            event.prevent_default();
            let Some(href) = event
                .current_target()
                .and_then(|target| target.dyn_into::<Element>().ok())
                .and_then(|anchor| anchor.get_attribute("href"))
            else {
                return;
            };
            let Some(selector) = anchor_target_selector(&href) else {
                return;
            };
            let target = document()
                .ok()
                .and_then(|document| document.query_selector(selector).ok().flatten());
            if let Some(target) = target {
                scroll_into_view(&target, web_sys::ScrollLogicalPosition::Start);
            }
        });
    }
}

fn wire_form_validation() {
    for form in query_all(NEEDS_VALIDATION_SELECTOR) {
        listen(&form, "submit", |event| {
            let Some(form) = event_form(&event) else {
                return;
            };
            if !form.check_validity() {
                event.prevent_default();
                event.stop_propagation();
            }
            let _ = form.class_list().add_1(WAS_VALIDATED_CLASS);
        });
    }
}

fn wire_keyboard_shortcuts(document: &Document) {
    listen(document, "keydown", |event| {
        let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        match shortcut_for(&event.key(), event.ctrl_key(), event.meta_key()) {
            Some(Shortcut::FocusSearch) => {
                event.prevent_default();
                if let Some(search) = query_all_html(SEARCH_INPUT_SELECTOR).first() {
                    let _ = search.focus();
                }
            }
            Some(Shortcut::CloseModals) => {
                for modal in query_all(OPEN_MODAL_SELECTOR) {
                    hide_bootstrap_modal(&modal);
                }
            }
            None => {}
        }
    });
}

fn wire_connectivity(window: &web_sys::Window) {
    listen(window, "online", |_| {
        if let Some(session) = session() {
            session.notify(ONLINE_MESSAGE, Severity::Success);
        }
    });
    listen(window, "offline", |_| {
        if let Some(session) = session() {
            session.notify(OFFLINE_MESSAGE, Severity::Warning);
        }
    });
}

fn wire_page_lifecycle(window: &web_sys::Window, document: &Document) {
    listen(document, "visibilitychange", |_| {
        if document_is_visible() {
            refresh_timestamps();
        }
    });
    listen(window, "pagehide", |_| teardown_session());
    listen(window, "pageshow", |_| {
        if session().is_none() {
            if let Err(error) = install_session() {
                set_boot_error(&error);
            }
        }
    });
}

fn document_is_visible() -> bool {
    document().is_ok_and(|document| !document.hidden())
}

/// Delegated on the toast container: records user dismissal so the expiry
/// timer finds the toast already gone.
pub(super) fn install_toast_dismiss_handler(container: &HtmlElement) {
    listen(container, "click", |event| {
        let Some(target) = event_target_element(&event) else {
            return;
        };
        if !matches!(target.closest(".btn-close"), Ok(Some(_))) {
            return;
        }
        let Some(id) = target
            .closest(".notification-toast")
            .ok()
            .flatten()
            .and_then(|toast| toast_id_from_element_id(&toast.id()))
        else {
            return;
        };
        if let Some(session) = session() {
            session.dismiss_notification(id);
        }
    });
}

pub(super) struct ScrollObserver {
    observer: web_sys::IntersectionObserver,
    _callback: Closure<dyn FnMut(js_sys::Array)>,
}

impl ScrollObserver {
    pub(super) fn disconnect(&self) {
        self.observer.disconnect();
    }
}

/// Observes `.animate-on-scroll` elements. Re-run with each session, since
/// teardown disconnects the observer.
pub(super) fn install_scroll_animations() {
    let targets = query_all(ANIMATE_ON_SCROLL_SELECTOR);
    if targets.is_empty() {
        return;
    }
    let callback = Closure::<dyn FnMut(js_sys::Array)>::new(|entries: js_sys::Array| {
        for entry in entries.iter() {
            let Ok(entry) = entry.dyn_into::<web_sys::IntersectionObserverEntry>() else {
                continue;
            };
            if entry.is_intersecting() {
                let _ = entry.target().class_list().add_1(FADE_IN_CLASS);
            }
        }
    });
    let observer = match web_sys::IntersectionObserver::new(callback.as_ref().unchecked_ref()) {
        Ok(observer) => observer,
        Err(_) => {
            tracing::debug!("IntersectionObserver is unavailable");
            return;
        }
    };
    for target in &targets {
        observer.observe(target);
    }
    let previous = SCROLL_OBSERVER.with(|slot| {
        slot.borrow_mut().replace(ScrollObserver {
            observer,
            _callback: callback,
        })
    });
    if let Some(previous) = previous {
        previous.disconnect();
    }
}

/// Relative timestamps refresh on a fixed cadence. Starting a new loop, or
/// tearing the session down, retires the previous one.
pub(super) fn start_timestamp_loop(period: Duration) {
    let generation = TIMESTAMP_LOOP_GENERATION.with(|current| {
        let next = current.get().wrapping_add(1);
        current.set(next);
        next
    });
    refresh_timestamps();
    spawn_local(async move {
        loop {
            sleep(period).await;
            if TIMESTAMP_LOOP_GENERATION.with(Cell::get) != generation {
                break;
            }
            refresh_timestamps();
        }
    });
}
