//! Musical Memory entry point
//!
//! The web build wires DOM events and browser timers to the controller; the
//! native build plays the same game in a terminal.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{AddEventListenerOptions, Element, Event, HtmlInputElement};

    use musical_memory::audio::AudioManager;
    use musical_memory::consts::TICK_INTERVAL_MS;
    use musical_memory::renderer::DomRenderer;
    use musical_memory::storage::{KeyValueStore, LocalStore, MemoryStore};
    use musical_memory::{Command, GameController, Settings};

    type Controller = GameController<DomRenderer, AudioManager, Box<dyn KeyValueStore>>;

    /// Game instance holding the controller and the running ticker
    struct Game {
        controller: Controller,
        ticker: Option<(i32, Closure<dyn FnMut()>)>,
    }

    fn seed() -> u64 {
        js_sys::Date::now() as u64
    }

    fn window() -> Option<web_sys::Window> {
        web_sys::window()
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Musical Memory starting...");

        let Some(document) = window().and_then(|w| w.document()) else {
            log::error!("No document available");
            return;
        };

        let store: Box<dyn KeyValueStore> = match LocalStore::open() {
            Some(store) => Box::new(store),
            None => {
                log::warn!("LocalStorage unavailable - scores will not persist");
                Box::new(MemoryStore::new())
            }
        };
        let settings = Settings::load(&store);

        let Some(renderer) = DomRenderer::new(document) else {
            log::error!("Page is missing game elements");
            return;
        };
        let audio = AudioManager::new(settings.sounds_path.clone(), settings.mixer());

        let controller = GameController::new(renderer, audio, store, settings, seed());
        let game = Rc::new(RefCell::new(Game {
            controller,
            ticker: None,
        }));

        setup_board_input(game.clone());
        setup_buttons(game.clone());
        setup_leaderboard_modal(game);

        log::info!("Musical Memory running!");
    }

    /// Carry out timer work requested by the controller
    fn run_commands(game: &Rc<RefCell<Game>>, commands: Vec<Command>) {
        let Some(window) = window() else { return };

        for command in commands {
            match command {
                Command::StartTicker => {
                    stop_ticker(game, &window);
                    let tick_game = game.clone();
                    let closure = Closure::<dyn FnMut()>::new(move || {
                        tick_game.borrow_mut().controller.tick();
                    });
                    match window.set_interval_with_callback_and_timeout_and_arguments_0(
                        closure.as_ref().unchecked_ref(),
                        TICK_INTERVAL_MS as i32,
                    ) {
                        Ok(handle) => game.borrow_mut().ticker = Some((handle, closure)),
                        Err(e) => log::error!("Could not start timer: {:?}", e),
                    }
                }
                Command::StopTicker => stop_ticker(game, &window),
                Command::Schedule { delay_ms, wakeup } => {
                    let wake_game = game.clone();
                    let closure = Closure::once(move || {
                        let commands = wake_game.borrow_mut().controller.wake(wakeup);
                        run_commands(&wake_game, commands);
                    });
                    let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                        closure.as_ref().unchecked_ref(),
                        delay_ms as i32,
                    );
                    closure.forget();
                }
            }
        }
    }

    fn stop_ticker(game: &Rc<RefCell<Game>>, window: &web_sys::Window) {
        let ticker = game.borrow_mut().ticker.take();
        if let Some((handle, _closure)) = ticker {
            window.clear_interval_with_handle(handle);
        }
    }

    /// Card index from a click/touch anywhere inside a card
    fn card_index(event: &Event) -> Option<usize> {
        let target: Element = event.target()?.dyn_into().ok()?;
        let card = target.closest(".card").ok()??;
        card.get_attribute("data-index")?.parse().ok()
    }

    fn setup_board_input(game: Rc<RefCell<Game>>) {
        let Some(board) = window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("game-board"))
        else {
            return;
        };

        let closure = Closure::<dyn FnMut(_)>::new(move |event: Event| {
            let Some(index) = card_index(&event) else {
                return;
            };
            // Stops the synthetic click that follows a touch
            event.prevent_default();
            let commands = game.borrow_mut().controller.flip(index);
            run_commands(&game, commands);
        });

        let _ = board.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        let _ = board.add_event_listener_with_callback_and_add_event_listener_options(
            "touchstart",
            closure.as_ref().unchecked_ref(),
            &options,
        );
        closure.forget();
    }

    fn on_click(id: &str, handler: impl FnMut(web_sys::MouseEvent) + 'static) {
        let Some(btn) = window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
        else {
            log::warn!("Missing button #{}", id);
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(handler);
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            on_click("restart-btn", move |_event| {
                let commands = game.borrow_mut().controller.restart(seed());
                run_commands(&game, commands);
            });
        }

        {
            let game = game.clone();
            on_click("save-score-btn", move |_event| {
                let name = window()
                    .and_then(|w| w.document())
                    .and_then(|d| d.get_element_by_id("player-name"))
                    .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
                    .map(|input| input.value())
                    .unwrap_or_default();
                let commands = game.borrow_mut().controller.save_score(&name, seed());
                run_commands(&game, commands);
            });
        }

        on_click("show-leaderboard-btn", move |_event| {
            game.borrow_mut().controller.show_leaderboard();
        });
    }

    fn setup_leaderboard_modal(game: Rc<RefCell<Game>>) {
        let Some(window) = window() else { return };
        let Some(modal) = window
            .document()
            .and_then(|d| d.get_element_by_id("leaderboard-modal"))
        else {
            return;
        };

        // Close button
        if let Ok(Some(btn)) = modal.query_selector(".close-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().controller.close_leaderboard();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Click on the backdrop (outside the dialog)
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::MouseEvent| {
            let on_backdrop = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .is_some_and(|el| el == modal);
            if on_backdrop {
                game.borrow_mut().controller.close_leaderboard();
            }
        });
        let _ = window.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
mod terminal_game {
    use std::collections::VecDeque;
    use std::io::{self, BufRead, Write};
    use std::path::PathBuf;
    use std::thread;
    use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

    use musical_memory::audio::SilentAudio;
    use musical_memory::renderer::TextRenderer;
    use musical_memory::storage::FileStore;
    use musical_memory::{Command, GameController, Pace, Settings};

    type Controller = GameController<TextRenderer, SilentAudio, FileStore>;

    const HELP: &str = "Comandos: 1-14 vira carta, r reinicia, l ranking, q sai";

    /// Wall-clock stand-in for the browser's one-second interval
    #[derive(Default)]
    struct Ticker {
        started: Option<Instant>,
        delivered: u64,
    }

    impl Ticker {
        fn start(&mut self) {
            self.started = Some(Instant::now());
            self.delivered = 0;
        }

        fn stop(&mut self) {
            self.started = None;
        }

        /// Deliver every whole second that passed since the last call
        fn catch_up(&mut self, game: &mut Controller) {
            let Some(started) = self.started else { return };
            let due = started.elapsed().as_secs();
            while self.delivered < due {
                game.tick();
                self.delivered += 1;
            }
        }
    }

    fn seed() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default()
    }

    fn data_dir() -> PathBuf {
        std::env::var_os("MUSICAL_MEMORY_DATA")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".musical-memory"))
    }

    /// `--pace <preset>` from the command line, if given
    fn pace_arg() -> Option<Pace> {
        let args: Vec<String> = std::env::args().collect();
        let pos = args.iter().position(|a| a == "--pace")?;
        let value = args.get(pos + 1)?;
        let pace = Pace::from_str(value);
        if pace.is_none() {
            log::warn!("Unknown pace '{}', keeping saved setting", value);
        }
        pace
    }

    fn run_commands(game: &mut Controller, ticker: &mut Ticker, commands: Vec<Command>) {
        let mut queue: VecDeque<Command> = commands.into();
        while let Some(command) = queue.pop_front() {
            match command {
                Command::StartTicker => ticker.start(),
                Command::StopTicker => ticker.stop(),
                Command::Schedule { delay_ms, wakeup } => {
                    print!("{}", game.renderer().frame());
                    let _ = io::stdout().flush();
                    thread::sleep(Duration::from_millis(u64::from(delay_ms)));
                    ticker.catch_up(game);
                    queue.extend(game.wake(wakeup));
                }
            }
        }
    }

    pub fn run() {
        let mut store = FileStore::new(data_dir());
        let mut settings = Settings::load(&store);
        if let Some(pace) = pace_arg() {
            settings.pace = pace;
            if let Err(e) = settings.save(&mut store) {
                log::warn!("Could not save settings: {}", e);
            }
        }
        log::info!("Pace: {}", settings.pace.as_str());

        let audio = SilentAudio {
            mixer: settings.mixer(),
        };
        let mut game = GameController::new(TextRenderer::new(), audio, store, settings, seed());
        let mut ticker = Ticker::default();

        println!("{}", HELP);
        print!("{}", game.renderer().frame());

        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();
        while let Some(Ok(line)) = lines.next() {
            ticker.catch_up(&mut game);

            let commands = match line.trim() {
                "q" => break,
                "r" => game.restart(seed()),
                "l" => {
                    if game.renderer().is_leaderboard_shown() {
                        game.close_leaderboard();
                    } else {
                        game.show_leaderboard();
                    }
                    Vec::new()
                }
                other => match other.parse::<usize>() {
                    Ok(n) if n >= 1 => game.flip(n - 1),
                    _ => {
                        println!("{}", HELP);
                        Vec::new()
                    }
                },
            };
            run_commands(&mut game, &mut ticker, commands);

            if game.renderer().is_win_shown() {
                print!("{}", game.renderer().frame());
                print!("Seu nome: ");
                let _ = io::stdout().flush();
                let name = match lines.next() {
                    Some(Ok(name)) => name,
                    _ => String::new(),
                };
                let commands = game.save_score(&name, seed());
                run_commands(&mut game, &mut ticker, commands);
                game.show_leaderboard();
            }

            print!("{}", game.renderer().frame());
            let _ = io::stdout().flush();
        }

        log::info!("Bye!");
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Musical Memory (terminal) starting...");
    terminal_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
