//! Browser runtime: the content-script entry points
//!
//! `bootstrap()` is the single trigger for a page. It runs the known-name
//! pass, then loads the vocabulary and runs the term pass, in that order, so
//! the two passes never race over the same text nodes. The controller it
//! builds is kept in a thread-local for the lifetime of the page.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, MouseEvent, Request, RequestInit, Response, Window};

use crate::config::EngineConfig;
use crate::controller::PageController;
use crate::host::dom::{DomController, DomHost};
use crate::host::PageHost;
use crate::scanner::KeywordCheck;
use crate::submission::{
    alert_text, block_text, interpret_reply, prepare_submission, SubmissionPayload, SubmitError,
    SubmitOutcome,
};
use crate::vocabulary::{parse_catalog, parse_names, ResourceError, VocabularyStore};

const SUBMIT_BUTTON_ID: &str = "crit-add-button";
const SUBMIT_BUTTON_STYLE: &str = "position: fixed; bottom: 20px; right: 20px; \
    z-index: 1000000; padding: 10px 18px; background: #FF6600; color: white; \
    border: none; border-radius: 6px; font-weight: bold; cursor: pointer;";

thread_local! {
    static PAGE: RefCell<Option<Rc<RefCell<DomController>>>> = const { RefCell::new(None) };
    static STARTED: Cell<bool> = const { Cell::new(false) };
}

#[wasm_bindgen]
extern "C" {
    /// `chrome.runtime.getURL`; throws outside an extension context
    #[wasm_bindgen(catch, js_namespace = ["chrome", "runtime"], js_name = getURL)]
    fn extension_url(path: &str) -> Result<String, JsValue>;
}

fn page() -> Option<Rc<RefCell<DomController>>> {
    PAGE.with(|p| p.borrow().clone())
}

fn js_message(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

fn resource_url(path: &str) -> String {
    extension_url(path).unwrap_or_else(|_| path.to_string())
}

// =============================================================================
// Resources
// =============================================================================

async fn fetch_text(window: &Window, path: &str) -> Result<String, ResourceError> {
    let url = resource_url(path);
    let response = JsFuture::from(window.fetch_with_str(&url))
        .await
        .map_err(|e| ResourceError::Fetch(js_message(&e)))?;
    let response: Response = response
        .dyn_into()
        .map_err(|_| ResourceError::Fetch(format!("{} did not return a response", path)))?;

    if !response.ok() {
        return Err(ResourceError::Status {
            path: path.to_string(),
            status: response.status(),
        });
    }

    let body = response
        .text()
        .map_err(|e| ResourceError::Fetch(js_message(&e)))?;
    JsFuture::from(body)
        .await
        .map_err(|e| ResourceError::Fetch(js_message(&e)))?
        .as_string()
        .ok_or_else(|| ResourceError::Parse(format!("{} body is not text", path)))
}

// =============================================================================
// Entry points
// =============================================================================

/// Start the engine on this page. Once a call gets past config parsing,
/// later calls are ignored; a call that fails before that can be retried.
#[wasm_bindgen]
pub async fn bootstrap(config: JsValue) -> Result<(), JsValue> {
    let config = EngineConfig::from_js(config)?;
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let host = DomHost::new(window.clone()).ok_or_else(|| JsValue::from_str("no document"))?;

    if STARTED.with(|s| s.replace(true)) {
        console_warn!("[Runtime] bootstrap() already ran on this page; ignoring");
        return Ok(());
    }

    let controller = Rc::new_cyclic(|weak| {
        RefCell::new(PageController::new(host.bound(weak.clone()), config.clone()))
    });
    PAGE.with(|p| *p.borrow_mut() = Some(controller.clone()));

    if controller.borrow().is_suppressed() {
        console_log!("[Runtime] Landscape page detected; highlighting disabled");
        return Ok(());
    }

    let start = js_sys::Date::now();

    if let Err(e) = install_submit_button(&window) {
        console_warn!("[Runtime] Could not add the ADD button: {:?}", e);
    }

    match fetch_text(&window, &config.resources.names)
        .await
        .and_then(|text| parse_names(&text))
    {
        Ok(names) => {
            controller.borrow_mut().highlight_names(names);
        }
        Err(e) => console_warn!("[Names] Skipping name links: {}", e),
    }

    let variants = fetch_text(&window, &config.resources.variants).await;
    let colors = fetch_text(&window, &config.resources.colors).await;
    let vocabulary = VocabularyStore::resolve(variants, colors);

    {
        let mut controller = controller.borrow_mut();
        controller.install_vocabulary(vocabulary);
        controller.highlight_terms();
    }

    console_log!("[Runtime] Ready in {:.1}ms", js_sys::Date::now() - start);
    Ok(())
}

/// Gating check for the current page:
/// `{ hasBothGroups, designKeywordsFound, criticalKeywordsFound }`
#[wasm_bindgen(js_name = checkKeywordsOnPage)]
pub fn check_keywords_on_page() -> Result<JsValue, JsValue> {
    let controller = page().ok_or_else(|| JsValue::from_str("bootstrap() has not run"))?;
    let check = controller
        .try_borrow()
        .map_err(|_| JsValue::from_str("engine is busy"))?
        .check_keywords()
        .unwrap_or(KeywordCheck {
            has_both_groups: false,
            design_keywords_found: Vec::new(),
            critical_keywords_found: Vec::new(),
        });
    serde_wasm_bindgen::to_value(&check).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// The ADD action: gate, check the catalog, submit, report with `alert()`
#[wasm_bindgen(js_name = submitCurrentPage)]
pub async fn submit_current_page() -> Result<(), JsValue> {
    let controller = page().ok_or_else(|| JsValue::from_str("bootstrap() has not run"))?;
    let (url, check, config) = {
        let c = controller
            .try_borrow()
            .map_err(|_| JsValue::from_str("engine is busy"))?;
        (c.host().location(), c.check_keywords(), c.config().clone())
    };
    let window = controller.borrow().host().window().clone();

    let Some(check) = check else {
        alert(&window, &alert_text(&Err(SubmitError::NoDocument)));
        return Ok(());
    };

    let catalog = match fetch_text(&window, &config.resources.catalog)
        .await
        .and_then(|text| parse_catalog(&text))
    {
        Ok(catalog) => catalog,
        Err(e) => {
            console_warn!("[Submit] Catalog unavailable ({}); relying on server check", e);
            Vec::new()
        }
    };

    let payload = match prepare_submission(&url, &check, &catalog) {
        Ok(payload) => payload,
        Err(block) => {
            let text = block_text(&block);
            console_log!("[Submit] {}", text);
            alert(&window, &text);
            return Ok(());
        }
    };

    console_log!("[Submit] Sending {}", payload.url);
    let result = post_submission(&window, &config.submit_endpoint, &payload).await;
    match &result {
        Ok(outcome) => console_log!("[Submit] {:?}", outcome),
        Err(e) => console_error!("[Submit] {}", e),
    }
    alert(&window, &alert_text(&result));
    Ok(())
}

async fn post_submission(
    window: &Window,
    endpoint: &str,
    payload: &SubmissionPayload,
) -> Result<SubmitOutcome, SubmitError> {
    let network = |e: JsValue| SubmitError::Network(js_message(&e));
    let body =
        serde_json::to_string(payload).map_err(|e| SubmitError::Network(e.to_string()))?;

    let headers = Headers::new().map_err(network)?;
    headers
        .set("Content-Type", "application/json")
        .map_err(network)?;

    let init = RequestInit::new();
    init.set_method("POST");
    init.set_headers(&headers);
    init.set_body(&JsValue::from_str(&body));

    let request = Request::new_with_str_and_init(endpoint, &init).map_err(network)?;
    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(network)?
        .dyn_into()
        .map_err(network)?;

    let status = response.status();
    let text = JsFuture::from(response.text().map_err(network)?)
        .await
        .map_err(network)?
        .as_string()
        .unwrap_or_default();
    interpret_reply(status, &text)
}

fn alert(window: &Window, message: &str) {
    if let Err(e) = window.alert_with_message(message) {
        console_error!("[Runtime] alert() failed: {:?}", e);
    }
}

fn install_submit_button(window: &Window) -> Result<(), JsValue> {
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let Some(body) = document.body() else {
        return Ok(());
    };
    if document.get_element_by_id(SUBMIT_BUTTON_ID).is_some() {
        return Ok(());
    }

    let button = document.create_element("button")?;
    button.set_id(SUBMIT_BUTTON_ID);
    button.set_text_content(Some("ADD"));
    button.set_attribute("style", SUBMIT_BUTTON_STYLE)?;

    let on_click = Closure::<dyn FnMut(MouseEvent)>::new(|event: MouseEvent| {
        event.stop_propagation();
        wasm_bindgen_futures::spawn_local(async {
            if let Err(e) = submit_current_page().await {
                console_error!("[Submit] {}", js_message(&e));
            }
        });
    });
    button.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
    on_click.forget();

    body.append_child(&button)?;
    Ok(())
}
