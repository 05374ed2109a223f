//! Game controller
//!
//! Owns one board's `GameState` and the collaborators that show it, play it
//! and persist its scores. Front-ends call the input methods and carry out
//! the returned `Command`s with whatever timers their platform has; deferred
//! work comes back in through `wake`.

use crate::audio::{AudioSink, SoundCue};
use crate::cards::CardRole;
use crate::highscores::{Leaderboard, MAX_HIGH_SCORES, ScoreEntry};
use crate::renderer::Renderer;
use crate::settings::Settings;
use crate::sim::{self, GameEvent, GameState, format_time};
use crate::storage::KeyValueStore;

/// Deferred step of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeupKind {
    /// Turn a mismatched pair back over
    HideMismatch,
    /// Play the win cue and show the win screen
    RevealWin,
}

/// A deferred step tagged with the board it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wakeup {
    pub kind: WakeupKind,
    pub session: u32,
}

/// Timer work for the front-end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Call `wake(wakeup)` after `delay_ms`
    Schedule { delay_ms: u32, wakeup: Wakeup },
    /// Start calling `tick()` every `consts::TICK_INTERVAL_MS`
    StartTicker,
    /// Stop the per-second ticker
    StopTicker,
}

pub struct GameController<R, A, S> {
    state: GameState,
    /// Incremented per board; wakeups from older boards are dropped
    session: u32,
    settings: Settings,
    renderer: R,
    audio: A,
    store: S,
}

impl<R: Renderer, A: AudioSink, S: KeyValueStore> GameController<R, A, S> {
    /// Create the controller and render the first board
    pub fn new(renderer: R, audio: A, store: S, settings: Settings, seed: u64) -> Self {
        let mut controller = Self {
            state: GameState::new(seed),
            session: 0,
            settings,
            renderer,
            audio,
            store,
        };
        controller.start_board(seed);
        controller
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn session(&self) -> u32 {
        self.session
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn start_board(&mut self, seed: u64) {
        self.state = GameState::new(seed);
        self.session = self.session.wrapping_add(1);
        self.renderer.build_board(&self.state.cards);
        self.renderer.set_moves(0);
        self.renderer.set_timer(&format_time(0));
        log::info!("Board {} dealt with seed {}", self.session, seed);
    }

    /// Throw away the current board and deal a new one
    pub fn restart(&mut self, seed: u64) -> Vec<Command> {
        self.renderer.hide_win();
        self.start_board(seed);
        vec![Command::StopTicker]
    }

    /// Card clicked or tapped
    pub fn flip(&mut self, index: usize) -> Vec<Command> {
        let events = sim::flip(&mut self.state, index);
        self.apply(events)
    }

    /// Deferred step came due
    pub fn wake(&mut self, wakeup: Wakeup) -> Vec<Command> {
        if wakeup.session != self.session {
            log::debug!("Dropping {:?} from board {}", wakeup.kind, wakeup.session);
            return Vec::new();
        }
        match wakeup.kind {
            WakeupKind::HideMismatch => {
                let events = sim::hide_mismatch(&mut self.state);
                self.apply(events)
            }
            WakeupKind::RevealWin => {
                self.play(SoundCue::Win);
                self.renderer
                    .show_win(&self.state.formatted_time(), self.state.moves);
                Vec::new()
            }
        }
    }

    /// One second passed on the ticker
    pub fn tick(&mut self) {
        if let Some(event) = sim::tick_timer(&mut self.state) {
            self.apply(vec![event]);
        }
    }

    /// Record the finished game and deal a new board
    ///
    /// Ignored unless the current board has been won.
    pub fn save_score(&mut self, player_name: &str, seed: u64) -> Vec<Command> {
        if !self.state.won {
            log::warn!("Ignoring score save before the board is cleared");
            return Vec::new();
        }

        let entry = ScoreEntry::new(player_name, self.state.elapsed_seconds, self.state.moves);
        let mut board = Leaderboard::load(&self.store);
        match board.add(entry) {
            Some(rank) => log::info!("New score ranked #{}", rank),
            None => log::info!("Score did not make the top {}", MAX_HIGH_SCORES),
        }
        if let Err(e) = board.save(&mut self.store) {
            log::error!("Could not save scores: {}", e);
        }

        self.restart(seed)
    }

    pub fn show_leaderboard(&mut self) {
        let board = Leaderboard::load(&self.store);
        self.renderer.show_leaderboard(&board);
    }

    pub fn close_leaderboard(&mut self) {
        self.renderer.hide_leaderboard();
    }

    fn wakeup(&self, kind: WakeupKind) -> Wakeup {
        Wakeup {
            kind,
            session: self.session,
        }
    }

    fn play(&mut self, cue: SoundCue) {
        if let Err(e) = self.audio.play(cue) {
            log::error!("Audio Error: {}", e);
        }
    }

    /// Reflect events in the view and collect timer work
    fn apply(&mut self, events: Vec<GameEvent>) -> Vec<Command> {
        let mut commands = Vec::new();

        for event in events {
            match event {
                GameEvent::CardFlipped { index } => {
                    self.renderer.set_face_up(index, true);
                    let def = self.state.cards[index].def;
                    if def.role == CardRole::Key {
                        self.play(SoundCue::Note(def.note));
                    }
                }
                GameEvent::TimerStarted => commands.push(Command::StartTicker),
                GameEvent::MoveCounted { moves } => self.renderer.set_moves(moves),
                GameEvent::PairMatched { first, second } => {
                    self.play(SoundCue::Success);
                    self.renderer.set_matched(first);
                    self.renderer.set_matched(second);
                }
                GameEvent::Mismatched { .. } => commands.push(Command::Schedule {
                    delay_ms: self.settings.mismatch_delay_ms(),
                    wakeup: self.wakeup(WakeupKind::HideMismatch),
                }),
                GameEvent::CardsHidden { first, second } => {
                    self.renderer.set_face_up(first, false);
                    self.renderer.set_face_up(second, false);
                }
                GameEvent::Won {
                    elapsed_seconds,
                    moves,
                } => {
                    log::info!("Board cleared in {} with {} moves", format_time(elapsed_seconds), moves);
                    commands.push(Command::StopTicker);
                    self.renderer.set_timer(&format_time(elapsed_seconds));
                    commands.push(Command::Schedule {
                        delay_ms: self.settings.win_delay_ms,
                        wakeup: self.wakeup(WakeupKind::RevealWin),
                    });
                }
                GameEvent::TimerTicked { elapsed_seconds } => {
                    self.renderer.set_timer(&format_time(elapsed_seconds));
                }
            }
        }

        commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioError;
    use crate::cards::Note;
    use crate::renderer::TextRenderer;
    use crate::storage::MemoryStore;

    /// Records cues; optionally fails every playback
    #[derive(Default)]
    struct RecordingAudio {
        played: Vec<SoundCue>,
        fail: bool,
    }

    impl AudioSink for RecordingAudio {
        fn play(&mut self, cue: SoundCue) -> Result<(), AudioError> {
            self.played.push(cue);
            if self.fail {
                return Err(AudioError::Playback {
                    asset: cue.asset_path("sounds"),
                    message: "NotAllowedError".to_string(),
                });
            }
            Ok(())
        }
    }

    type TestController = GameController<TextRenderer, RecordingAudio, MemoryStore>;

    fn controller(seed: u64) -> TestController {
        GameController::new(
            TextRenderer::new(),
            RecordingAudio::default(),
            MemoryStore::new(),
            Settings::default(),
            seed,
        )
    }

    fn find(c: &TestController, note: Note, role: CardRole) -> usize {
        c.state()
            .cards
            .iter()
            .position(|card| card.def.note == note && card.def.role == role)
            .unwrap()
    }

    /// Match every pair, running any wakeups immediately
    fn solve(c: &mut TestController) -> Vec<Command> {
        let mut commands = Vec::new();
        for note in Note::ALL {
            let name = find(c, note, CardRole::Name);
            let key = find(c, note, CardRole::Key);
            commands.extend(c.flip(name));
            commands.extend(c.flip(key));
        }
        commands
    }

    fn scheduled(commands: &[Command]) -> Vec<Wakeup> {
        commands
            .iter()
            .filter_map(|cmd| match cmd {
                Command::Schedule { wakeup, .. } => Some(*wakeup),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_do_name_then_do_key_matches() {
        let mut c = controller(12345);
        let name = find(&c, Note::Do, CardRole::Name);
        let key = find(&c, Note::Do, CardRole::Key);

        let commands = c.flip(name);
        assert_eq!(commands, vec![Command::StartTicker]);
        let commands = c.flip(key);
        assert!(commands.is_empty());

        assert_eq!(c.state().matched_pairs, 1);
        assert_eq!(c.state().moves, 1);
        assert!(!c.state().cards[name].is_interactive());
        assert!(!c.state().cards[key].is_interactive());
        assert_eq!(c.renderer().moves(), 1);
        assert!(c.renderer().is_face_up(name) && c.renderer().is_face_up(key));
        assert_eq!(
            c.audio().played,
            vec![SoundCue::Note(Note::Do), SoundCue::Success]
        );

        // Clicking a matched card changes nothing
        assert!(c.flip(name).is_empty());
        assert_eq!(c.state().moves, 1);
    }

    #[test]
    fn test_do_name_then_re_key_mismatches() {
        let mut c = controller(12345);
        let name = find(&c, Note::Do, CardRole::Name);
        let key = find(&c, Note::Re, CardRole::Key);

        c.flip(name);
        let commands = c.flip(key);
        let wakeups = scheduled(&commands);
        assert_eq!(
            commands,
            vec![Command::Schedule {
                delay_ms: 1200,
                wakeup: Wakeup {
                    kind: WakeupKind::HideMismatch,
                    session: c.session(),
                },
            }]
        );
        assert_eq!(c.state().moves, 1);
        assert_eq!(c.state().matched_pairs, 0);
        assert!(c.renderer().is_face_up(name));

        c.wake(wakeups[0]);
        assert!(!c.renderer().is_face_up(name));
        assert!(!c.renderer().is_face_up(key));
        assert!(!c.state().board_locked);
        assert_eq!(c.state().matched_pairs, 0);
    }

    #[test]
    fn test_ticks_update_timer_display() {
        let mut c = controller(3);
        c.tick();
        assert_eq!(c.renderer().timer(), "00:00");

        c.flip(0);
        for _ in 0..65 {
            c.tick();
        }
        assert_eq!(c.renderer().timer(), "01:05");
    }

    #[test]
    fn test_win_reveals_screen_after_delay() {
        let mut c = controller(777);
        c.flip(0);
        c.tick();
        c.tick();
        let partner = c.state().partner_of(0).unwrap();
        c.flip(partner);

        let commands = solve(&mut c);
        assert!(commands.contains(&Command::StopTicker));
        let wakeups = scheduled(&commands);
        assert_eq!(wakeups.len(), 1);
        assert_eq!(wakeups[0].kind, WakeupKind::RevealWin);
        assert!(!c.renderer().is_win_shown());

        c.wake(wakeups[0]);
        assert!(c.renderer().is_win_shown());
        assert!(c.renderer().frame().contains("00:02"));
        assert_eq!(c.audio().played.last(), Some(&SoundCue::Win));

        // Clock stays stopped
        c.tick();
        assert_eq!(c.renderer().timer(), "00:02");
    }

    #[test]
    fn test_save_blank_name_persists_default() {
        let mut c = controller(31);
        solve(&mut c);

        let commands = c.save_score("   ", 32);
        assert_eq!(commands, vec![Command::StopTicker]);

        let board = Leaderboard::load(c.store());
        assert_eq!(board.entries.len(), 1);
        assert_eq!(board.entries[0].player_name, "Anônimo");
        assert_eq!(board.entries[0].move_count, 7);

        // New board dealt, win screen gone
        assert_eq!(c.state().seed, 32);
        assert_eq!(c.state().matched_pairs, 0);
        assert!(!c.renderer().is_win_shown());
    }

    #[test]
    fn test_save_before_win_is_ignored() {
        let mut c = controller(31);
        assert!(c.save_score("Ana", 1).is_empty());
        assert!(Leaderboard::load(c.store()).is_empty());
        assert_eq!(c.state().seed, 31);
    }

    #[test]
    fn test_stale_wakeup_after_restart_is_dropped() {
        let mut c = controller(12345);
        let name = find(&c, Note::Do, CardRole::Name);
        let key = find(&c, Note::Re, CardRole::Key);
        c.flip(name);
        let wakeups = scheduled(&c.flip(key));

        c.restart(54321);
        let first = c.state().cards[0].def;
        let second = (1..c.state().cards.len())
            .find(|&i| !c.state().cards[i].def.pairs_with(&first))
            .unwrap();
        c.flip(0);
        c.flip(second);
        assert!(c.state().board_locked);

        // Old board's flip-back must not unlock the new board
        assert!(c.wake(wakeups[0]).is_empty());
        assert!(c.state().board_locked);
        assert!(c.renderer().is_face_up(0));
    }

    #[test]
    fn test_restart_resets_counters() {
        let mut c = controller(9);
        c.flip(0);
        c.tick();
        let partner = c.state().partner_of(0).unwrap();
        c.flip(partner);

        let commands = c.restart(10);
        assert_eq!(commands, vec![Command::StopTicker]);
        assert_eq!(c.state().moves, 0);
        assert_eq!(c.state().elapsed_seconds, 0);
        assert_eq!(c.renderer().timer(), "00:00");
        assert_eq!(c.renderer().moves(), 0);
        assert!(!c.renderer().is_face_up(0));

        // Timer starts again on the new board
        assert_eq!(c.flip(0), vec![Command::StartTicker]);
    }

    #[test]
    fn test_audio_failures_do_not_interrupt_play() {
        let mut c = GameController::new(
            TextRenderer::new(),
            RecordingAudio {
                fail: true,
                ..Default::default()
            },
            MemoryStore::new(),
            Settings::default(),
            2,
        );
        let commands = solve(&mut c);
        assert!(c.state().won);
        c.wake(scheduled(&commands)[0]);
        assert!(c.renderer().is_win_shown());
    }

    #[test]
    fn test_leaderboard_overlay() {
        let mut c = controller(4);
        c.show_leaderboard();
        assert!(c.renderer().is_leaderboard_shown());
        assert!(
            c.renderer()
                .frame()
                .contains(crate::highscores::EMPTY_LEADERBOARD_MESSAGE)
        );
        c.close_leaderboard();
        assert!(!c.renderer().is_leaderboard_shown());

        solve(&mut c);
        c.save_score("Bia", 5);
        c.show_leaderboard();
        assert!(c.renderer().frame().contains("Bia"));
    }

    #[test]
    fn test_pace_sets_mismatch_delay() {
        let mut c = GameController::new(
            TextRenderer::new(),
            RecordingAudio::default(),
            MemoryStore::new(),
            Settings::from_pace(crate::settings::Pace::Quick),
            12345,
        );
        let name = find(&c, Note::Do, CardRole::Name);
        let key = find(&c, Note::Re, CardRole::Key);
        c.flip(name);
        match c.flip(key).as_slice() {
            [Command::Schedule { delay_ms, .. }] => assert_eq!(*delay_ms, 700),
            other => panic!("unexpected commands {:?}", other),
        }
    }
}
