//! Browser bindings.
//!
//! Implements the core traits over `web_sys` and exposes
//! [`CountupController`] to JavaScript. Loading the module starts a
//! controller for the whole document once it has been parsed.

use crate::animator::Animator;
use crate::config::CountupConfig;
use crate::logging::{init_logging, LogConfig};
use crate::result::{CountupError, CountupResult};
use crate::scheduler::{FrameCallback, FrameScheduler};
use crate::target::CounterTarget;
use crate::watcher::{NodeTree, Watcher};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, trace, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, MutationObserver, MutationObserverInit,
    MutationRecord, Node, NodeList,
};

impl From<CountupError> for JsValue {
    fn from(err: CountupError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

fn js_error(context: &str, err: &JsValue) -> CountupError {
    CountupError::Browser {
        message: format!("{context}: {err:?}"),
    }
}

fn window() -> CountupResult<web_sys::Window> {
    web_sys::window().ok_or_else(|| CountupError::Browser {
        message: "no global window".to_string(),
    })
}

fn document() -> CountupResult<Document> {
    window()?.document().ok_or_else(|| CountupError::Browser {
        message: "window has no document".to_string(),
    })
}

fn node_list(list: &NodeList) -> Vec<Node> {
    (0..list.length()).filter_map(|i| list.item(i)).collect()
}

/// `requestAnimationFrame` on the global window
#[derive(Debug, Clone, Copy, Default)]
pub struct AnimationFrameScheduler;

impl FrameScheduler for AnimationFrameScheduler {
    fn request_frame(&self, callback: FrameCallback) {
        let closure = Closure::once_into_js(move |timestamp: f64| callback(timestamp));
        let requested = window().and_then(|w| {
            w.request_animation_frame(closure.unchecked_ref())
                .map_err(|e| js_error("requestAnimationFrame", &e))
        });
        if let Err(err) = requested {
            warn!(error = %err, "frame request dropped");
        }
    }
}

impl CounterTarget for Element {
    fn source_value(&self, attribute: &str) -> Option<String> {
        self.get_attribute(attribute)
    }

    fn is_processing(&self, attribute: &str) -> bool {
        self.get_attribute(attribute).as_deref() == Some("true")
    }

    fn mark_processing(&self, attribute: &str) {
        if let Err(err) = self.set_attribute(attribute, "true") {
            warn!(error = ?err, attribute, "could not set processing flag");
        }
    }

    fn set_display_text(&self, text: &str) {
        self.set_text_content(Some(text));
    }

    fn mark_complete(&self, class: &str) {
        if let Err(err) = self.class_list().add_1(class) {
            warn!(error = ?err, class, "could not add completion class");
        }
    }
}

impl NodeTree for Node {
    fn is_element(&self) -> bool {
        self.node_type() == Node::ELEMENT_NODE
    }

    fn has_class(&self, class: &str) -> bool {
        self.dyn_ref::<Element>()
            .is_some_and(|el| el.class_list().contains(class))
    }

    fn descendants_with_class(&self, class: &str) -> Vec<Self> {
        let selector = format!(".{class}");
        let found = if let Some(el) = self.dyn_ref::<Element>() {
            el.query_selector_all(&selector)
        } else if let Some(doc) = self.dyn_ref::<Document>() {
            doc.query_selector_all(&selector)
        } else {
            return Vec::new();
        };
        match found {
            Ok(list) => node_list(&list),
            Err(err) => {
                warn!(error = ?err, %selector, "selector query failed");
                Vec::new()
            }
        }
    }
}

type ObserverCallback = Closure<dyn FnMut(js_sys::Array, MutationObserver)>;

/// Watches the document and animates every marker-class element it finds
#[wasm_bindgen]
pub struct CountupController {
    animator: Animator<AnimationFrameScheduler>,
    watcher: Rc<RefCell<Watcher<Node>>>,
    observer: Option<MutationObserver>,
    callback: Option<ObserverCallback>,
}

impl std::fmt::Debug for CountupController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CountupController")
            .field("animator", &self.animator)
            .field("watcher", &self.watcher)
            .field("observing", &self.observer.is_some())
            .finish()
    }
}

impl CountupController {
    /// Controller for a config
    ///
    /// # Errors
    ///
    /// Returns error if `config` fails validation
    pub fn with_config(config: CountupConfig) -> CountupResult<Self> {
        let animator = Animator::new(config, AnimationFrameScheduler)?;
        let dispatch = animator.clone();
        let watcher = Watcher::new(&animator.config().marker_class, move |node: Node| {
            match node.dyn_into::<Element>() {
                Ok(element) => {
                    let outcome = dispatch.animate(element);
                    trace!(?outcome, "element dispatched");
                }
                Err(_) => trace!("discovered node is not an element"),
            }
        });
        Ok(Self {
            animator,
            watcher: Rc::new(RefCell::new(watcher)),
            observer: None,
            callback: None,
        })
    }

    fn observe(&mut self, document: &Document) -> CountupResult<()> {
        let root: Node = match document.body() {
            Some(body) => body.into(),
            None => document.clone().into(),
        };

        let watcher = Rc::clone(&self.watcher);
        let callback: ObserverCallback =
            Closure::new(move |records: js_sys::Array, _observer: MutationObserver| {
                let mut watcher = watcher.borrow_mut();
                for record in records.iter() {
                    if let Ok(record) = record.dyn_into::<MutationRecord>() {
                        watcher.handle_added(node_list(&record.added_nodes()));
                    }
                }
            });

        let observer = MutationObserver::new(callback.as_ref().unchecked_ref())
            .map_err(|e| js_error("MutationObserver", &e))?;
        let options = MutationObserverInit::new();
        options.set_child_list(true);
        options.set_subtree(true);
        observer
            .observe_with_options(&root, &options)
            .map_err(|e| js_error("observe", &e))?;

        self.observer = Some(observer);
        self.callback = Some(callback);
        Ok(())
    }

    fn disconnect(&mut self) {
        if let Some(observer) = self.observer.take() {
            observer.disconnect();
        }
        self.callback = None;
    }
}

#[wasm_bindgen]
impl CountupController {
    /// Controller with the default config
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<CountupController, JsValue> {
        Ok(Self::with_config(CountupConfig::default())?)
    }

    /// Controller from a JSON config; missing fields take defaults
    #[wasm_bindgen(js_name = withConfigJson)]
    pub fn with_config_json(json: &str) -> Result<CountupController, JsValue> {
        Ok(Self::with_config(CountupConfig::from_json(json)?)?)
    }

    /// Observe the document body for insertions, then sweep the document.
    ///
    /// Returns the number of elements the sweep dispatched.
    pub fn start(&mut self) -> Result<usize, JsValue> {
        let document = document()?;
        if self.observer.is_none() {
            self.observe(&document)?;
        }
        let count = self.watcher.borrow_mut().start(&document);
        debug!(count, "count-up controller started");
        Ok(count)
    }

    /// Stop observing; runs already started finish on their own
    pub fn stop(&mut self) {
        self.disconnect();
        self.watcher.borrow_mut().stop();
    }

    /// Sweep the document again, e.g. after a source attribute was filled in
    pub fn rescan(&self) -> Result<usize, JsValue> {
        let document = document()?;
        Ok(self.watcher.borrow_mut().rescan(&document))
    }

    /// Animate one element directly; true if a run was started
    pub fn animate(&self, element: Element) -> bool {
        self.animator.animate(element) == crate::animator::AnimateOutcome::Started
    }

    /// Whether insertions are being observed
    #[wasm_bindgen(getter)]
    pub fn watching(&self) -> bool {
        self.watcher.borrow().is_watching()
    }
}

impl Drop for CountupController {
    fn drop(&mut self) {
        self.disconnect();
    }
}

thread_local! {
    static AUTO: RefCell<Option<CountupController>> = const { RefCell::new(None) };
}

fn start_auto() {
    let started = CountupController::new().and_then(|mut controller| {
        controller.start()?;
        Ok(controller)
    });
    match started {
        Ok(controller) => AUTO.with(|slot| *slot.borrow_mut() = Some(controller)),
        Err(err) => warn!(error = ?err, "automatic count-up not started"),
    }
}

/// Module entry point: start counting once the document is parsed
#[wasm_bindgen(start)]
pub fn bootstrap() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    if let Err(err) = init_logging(&LogConfig::default()) {
        web_sys::console::warn_1(&err.into());
    }

    let document = document()?;
    if document.ready_state() == "loading" {
        let on_ready = Closure::once_into_js(move || start_auto());
        document
            .add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())
            .map_err(|e| js_error("DOMContentLoaded listener", &e))?;
    } else {
        start_auto();
    }
    Ok(())
}

/// Stop the controller started at load, if any
#[wasm_bindgen(js_name = stopAutoCountup)]
pub fn stop_auto_countup() {
    AUTO.with(|slot| {
        if let Some(controller) = slot.borrow_mut().as_mut() {
            controller.stop();
        }
    });
}
