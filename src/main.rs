//! Backlog Goblin entry point
//!
//! Web: renders the pile into the page and drives persistence from the
//! animation-frame loop. Native: small command runner over a JSON file.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod web_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlInputElement, MouseEvent};

    use backlog_goblin::platform::{self, LocalStorageStore};
    use backlog_goblin::scene::{self, BoxLayout, Scene, StatusPalette};
    use backlog_goblin::{Backlog, EntryId, Settings, ValidationError};

    /// App instance holding all state
    struct App {
        backlog: Backlog<LocalStorageStore>,
        settings: Settings,
        /// Entry that gets the one-shot drop-in animation
        just_added: Option<EntryId>,
        /// Pile changed since the last render
        needs_render: bool,
        was_loaded: bool,
    }

    impl App {
        fn new(settings: Settings) -> Self {
            let mut backlog = Backlog::new(LocalStorageStore::new(), &settings);
            backlog.initialize();
            Self {
                backlog,
                settings,
                just_added: None,
                needs_render: true,
                was_loaded: false,
            }
        }

        /// Per-frame persistence step
        fn update(&mut self, time: u64) {
            self.backlog.pump(time);
            if !self.was_loaded && self.backlog.is_loaded() {
                self.was_loaded = true;
                self.needs_render = true;
            }
        }

        fn add_entry(&mut self, name: &str, quantity: &str) -> Result<(), ValidationError> {
            let id = self.backlog.add_entry(name, quantity)?;
            if !self.settings.reduced_motion {
                self.just_added = Some(id);
            }
            self.needs_render = true;
            Ok(())
        }

        fn cycle_status(&mut self, id: &EntryId) {
            if self.backlog.cycle_status(id).is_some() {
                self.needs_render = true;
            }
        }

        fn delete_entry(&mut self, id: &EntryId) {
            if self.backlog.delete_entry(id).is_some() {
                self.needs_render = true;
            }
        }

        /// Rebuild the pile and captions in the DOM
        fn render(&mut self, document: &Document) {
            if !self.needs_render {
                return;
            }
            self.needs_render = false;

            let entries = self.backlog.snapshot();
            let count = entries.len();
            let scene = Scene::for_count(count);

            if let Some(el) = document.get_element_by_id("scene-tint") {
                let _ = el.set_attribute("style", &format!("background-color: {}", scene.background));
            }
            if let Some(el) = document.get_element_by_id("subtitle") {
                let text = if self.settings.show_scene_labels && scene.has_label() {
                    scene.label.to_string()
                } else {
                    scene::pile_caption(count)
                };
                el.set_text_content(Some(&text));
            }
            if let Some(el) = document.get_element_by_id("goblin-label") {
                el.set_text_content(Some(scene::goblin_mood(count)));
            }

            let Some(pile) = document.get_element_by_id("pile") else {
                return;
            };
            pile.set_inner_html("");
            let width = pile.client_width() as f32;

            for (level, entry) in scene::render_order(entries) {
                let layout = BoxLayout::for_entry(entry, level);
                let palette = StatusPalette::for_status(entry.status);
                let is_new = self.just_added.as_ref() == Some(&entry.id);

                let Ok(boxed) = build_box(document, entry, &layout, &palette, width, is_new) else {
                    log::warn!("Could not build box for {}", entry.id);
                    continue;
                };
                let _ = pile.append_child(&boxed);
            }

            self.just_added = None;
        }
    }

    fn build_box(
        document: &Document,
        entry: &backlog_goblin::BacklogEntry,
        layout: &BoxLayout,
        palette: &StatusPalette,
        container_width: f32,
        is_new: bool,
    ) -> Result<Element, JsValue> {
        let boxed = document.create_element("div")?;
        boxed.set_class_name(if is_new { "box falling" } else { "box" });
        boxed.set_attribute("data-id", entry.id.as_str())?;
        boxed.set_attribute(
            "style",
            &format!(
                "background-color: {}; border-color: {}; width: {}px; height: {}px; margin-left: {}px",
                palette.fill,
                palette.border,
                layout.size.x,
                layout.size.y,
                layout.margin_left(container_width),
            ),
        )?;

        let title = document.create_element("div")?;
        title.set_class_name("box-title");
        title.set_text_content(Some(&entry.name));
        boxed.append_child(&title)?;

        let info = document.create_element("div")?;
        info.set_class_name("box-info");
        info.set_text_content(Some(&scene::entry_caption(entry)));
        boxed.append_child(&info)?;

        let delete = document.create_element("button")?;
        delete.set_class_name("box-delete");
        delete.set_attribute("data-action", "delete")?;
        delete.set_text_content(Some("Delete"));
        boxed.append_child(&delete)?;

        Ok(boxed)
    }

    fn input_element(document: &Document, id: &str) -> Option<HtmlInputElement> {
        document.get_element_by_id(id)?.dyn_into::<HtmlInputElement>().ok()
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Backlog Goblin starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let settings = Settings::load();
        let app = Rc::new(RefCell::new(App::new(settings)));

        setup_pile_handlers(&document, app.clone());
        setup_add_form(&document, app.clone());
        setup_flush_on_hide(&document, app.clone());
        setup_preferences(&document, app.clone());

        // Start frame loop
        request_animation_frame(app);

        log::info!("Backlog Goblin running!");
    }

    /// Tap a box to cycle its status, tap its delete button to remove it
    fn setup_pile_handlers(document: &Document, app: Rc<RefCell<App>>) {
        let Some(pile) = document.get_element_by_id("pile") else {
            log::error!("No #pile element");
            return;
        };

        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
                return;
            };
            let Some(boxed) = target.closest("[data-id]").ok().flatten() else {
                return;
            };
            let Some(id) = boxed.get_attribute("data-id") else {
                return;
            };
            let id = EntryId::new(id);

            let mut a = app.borrow_mut();
            if target.get_attribute("data-action").as_deref() == Some("delete") {
                a.delete_entry(&id);
            } else {
                a.cycle_status(&id);
            }
        });
        let _ = pile.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_add_form(document: &Document, app: Rc<RefCell<App>>) {
        let Some(btn) = document.get_element_by_id("add-btn") else {
            log::error!("No #add-btn element");
            return;
        };

        let document = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            let (Some(name), Some(quantity)) = (
                input_element(&document, "new-name"),
                input_element(&document, "new-quantity"),
            ) else {
                return;
            };

            let result = app.borrow_mut().add_entry(&name.value(), &quantity.value());
            let error_el = document.get_element_by_id("form-error");
            match result {
                Ok(()) => {
                    name.set_value("");
                    quantity.set_value("");
                    if let Some(el) = error_el {
                        el.set_text_content(None);
                    }
                }
                Err(e) => {
                    if let Some(el) = error_el {
                        el.set_text_content(Some(&e.to_string()));
                    }
                }
            }
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Reduced-motion and scene-label toggles, saved as soon as they change
    fn setup_preferences(document: &Document, app: Rc<RefCell<App>>) {
        for (id, reduced_motion) in [("reduced-motion", true), ("scene-labels", false)] {
            let Some(toggle) = input_element(document, id) else {
                continue;
            };
            {
                let a = app.borrow();
                toggle.set_checked(if reduced_motion {
                    a.settings.reduced_motion
                } else {
                    a.settings.show_scene_labels
                });
            }

            let app = app.clone();
            let toggle_clone = toggle.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut a = app.borrow_mut();
                if reduced_motion {
                    a.settings.reduced_motion = toggle_clone.checked();
                } else {
                    a.settings.show_scene_labels = toggle_clone.checked();
                    a.needs_render = true;
                }
                a.settings.save();
            });
            let _ = toggle.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Write pending changes when the page goes to the background
    fn setup_flush_on_hide(document: &Document, app: Rc<RefCell<App>>) {
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                app.borrow_mut().backlog.flush();
                log::info!("Flushed pile (page hidden)");
            }
        });
        let _ = document.add_event_listener_with_callback(
            "visibilitychange",
            closure.as_ref().unchecked_ref(),
        );
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            frame_loop(app);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>) {
        {
            let mut a = app.borrow_mut();
            a.update(platform::now_ms());
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                a.render(&document);
            }
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    web_app::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(message) = native::run(&args) {
        eprintln!("{message}");
        eprintln!("{}", native::USAGE);
        std::process::exit(2);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use backlog_goblin::persistence::FileStore;
    use backlog_goblin::scene::{self, Scene};
    use backlog_goblin::{Backlog, EntryId, Settings};

    pub const USAGE: &str = "usage: backlog-goblin [list | add <name> [quantity] | cycle <id> | delete <id>]";

    pub fn run(args: &[String]) -> Result<(), String> {
        let settings = Settings::load();
        let dir = std::env::var("BACKLOG_GOBLIN_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));
        log::info!("Using pile in {} (key {})", dir.display(), settings.storage_key);

        let mut backlog = Backlog::new(FileStore::new(dir), &settings);
        backlog.initialize();
        backlog.flush();

        match args.first().map(String::as_str) {
            None | Some("list") => {}
            Some("add") => {
                let name = args.get(1).ok_or("add needs a name")?;
                let quantity = args.get(2).map(String::as_str).unwrap_or("");
                let id = backlog.add_entry(name, quantity).map_err(|e| e.to_string())?;
                println!("added {id}");
            }
            Some("cycle") => {
                let id = EntryId::new(args.get(1).ok_or("cycle needs an id")?.as_str());
                match backlog.cycle_status(&id) {
                    Some(status) => println!("{id} is now {}", status.label()),
                    None => println!("no entry {id}"),
                }
            }
            Some("delete") => {
                let id = EntryId::new(args.get(1).ok_or("delete needs an id")?.as_str());
                match backlog.delete_entry(&id) {
                    Some(entry) => println!("deleted {}", entry.name),
                    None => println!("no entry {id}"),
                }
            }
            Some(other) => return Err(format!("unknown command {other:?}")),
        }

        backlog.flush();
        print_pile(&backlog);
        Ok(())
    }

    fn print_pile<S: backlog_goblin::PersistentStore>(backlog: &Backlog<S>) {
        let count = backlog.len();
        let scene = Scene::for_count(count);
        if scene.has_label() {
            println!("{}", scene.label);
        }
        println!("{}", scene::pile_caption(count));
        for (_, entry) in scene::render_order(backlog.snapshot()) {
            println!("  [{}] {} ({})", entry.id, entry.name, scene::entry_caption(entry));
        }
        println!("🧌 {}", scene::goblin_mood(count));
    }
}
