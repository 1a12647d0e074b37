//! End-to-end playback tests.
//!
//! A recording output timestamps every call with the tick it happened on, so
//! the tests can check relative timing of whole scores.

use mml_tone::score::Bounded;
use mml_tone::{PlayerState, Score, ToneOutput, TonePlayer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Event {
    Play(u16),
    Silence,
}

#[derive(Default)]
struct Timeline {
    tick: usize,
    events: Vec<(usize, Event)>,
}

impl ToneOutput for Timeline {
    fn configure(&mut self, _channel: u8) {}

    fn play(&mut self, _channel: u8, frequency: u16) {
        self.events.push((self.tick, Event::Play(frequency)));
    }

    fn silence(&mut self, _channel: u8) {
        self.events.push((self.tick, Event::Silence));
    }
}

struct Run {
    events: Vec<(usize, Event)>,
    refreshed: Vec<bool>,
    last: Vec<bool>,
    finished_at: usize,
}

fn run<S: Score>(score: S) -> Run {
    let mut player = TonePlayer::new(0, score, Timeline::default());
    player.setup();
    player.start();

    let mut refreshed = Vec::new();
    let mut last = Vec::new();
    for tick in 0..10_000 {
        player.output_mut().tick = tick;
        player.step();
        if player.finished() {
            return Run {
                events: player.into_output().events,
                refreshed,
                last,
                finished_at: tick,
            };
        }
        refreshed.push(player.refreshed());
        last.push(player.last());
    }
    panic!("score never finished");
}

fn refreshed_ticks(run: &Run) -> Vec<usize> {
    run.refreshed
        .iter()
        .enumerate()
        .filter(|(_, r)| **r)
        .map(|(t, _)| t)
        .collect()
}

#[test]
fn test_relative_timing() {
    let run = run("4C8 D16 E4");
    assert_eq!(
        run.events,
        vec![
            (0, Event::Play(262)),
            (8, Event::Play(294)),
            (12, Event::Play(330)),
            (28, Event::Silence),
        ]
    );
    assert_eq!(run.finished_at, 28);
}

#[test]
fn test_octave_carries_over() {
    let run = run("5C16 D 3E");
    assert_eq!(
        run.events,
        vec![
            (0, Event::Play(523)),
            (4, Event::Play(587)),
            (8, Event::Play(165)),
            (12, Event::Silence),
        ]
    );
}

#[test]
fn test_cut_silences_one_tick_early() {
    let run = run("4A8/ 4B8");
    assert_eq!(
        run.events,
        vec![
            (0, Event::Play(440)),
            (7, Event::Silence),
            (8, Event::Play(494)),
            (16, Event::Silence),
        ]
    );

    let run = self::run("A16/ A16");
    assert_eq!(run.events[1], (3, Event::Silence));
    assert_eq!(run.events[2], (4, Event::Play(440)));
}

#[test]
fn test_dotted_note_timing() {
    let run = run("4A8. B");
    // 8 ticks + 4 for the dot
    assert_eq!(run.events[1], (12, Event::Play(494)));
    assert_eq!(run.finished_at, 20);
}

#[test]
fn test_rests_keep_time() {
    let run = run("4A16 R8 A");
    assert_eq!(
        run.events,
        vec![
            (0, Event::Play(440)),
            (4, Event::Silence),
            (12, Event::Play(440)),
            (20, Event::Silence),
        ]
    );
}

#[test]
fn test_refreshed_exactly_one_tick_per_note() {
    let run = run("4C8 D16. E32 F");
    assert_eq!(refreshed_ticks(&run), vec![0, 8, 14, 16]);
    assert_eq!(run.finished_at, 18);
}

#[test]
fn test_last_flag_set_with_final_note() {
    let run = run("C16 D16");
    assert_eq!(run.last, vec![false, false, false, false, true, true, true, true]);
    assert_eq!(run.finished_at, 8);
}

#[test]
fn test_finished_is_terminal() {
    let mut player = TonePlayer::new(0, "4A32 B32", Timeline::default());
    player.start();
    while !player.finished() {
        player.step();
    }
    let events = player.output().events.len();
    let flags = player.flags();
    for tick in 0..100 {
        player.output_mut().tick = tick;
        player.step();
    }
    assert_eq!(player.state(), PlayerState::Finished);
    assert_eq!(player.output().events.len(), events);
    assert_eq!(player.flags(), flags);
}

#[test]
fn test_overlong_token_drifts_into_next() {
    // "4C#16./X" does not fit: the X comes back as its own (silent) token
    let run = run("4C#16./X E");
    assert_eq!(
        run.events,
        vec![
            (0, Event::Play(277)),
            (5, Event::Silence),
            (6, Event::Silence),
            (10, Event::Play(330)),
            (14, Event::Silence),
        ]
    );
}

#[test]
fn test_bounded_program_memory_score() {
    let storage = *b"A16 B16\0\0\0\0\0";
    let run = run(Bounded::new(storage, 7));
    assert_eq!(
        run.events,
        vec![(0, Event::Play(440)), (4, Event::Play(494)), (8, Event::Silence)]
    );
}

#[test]
fn test_stop_pauses_timing() {
    let mut player = TonePlayer::new(0, "4A8 B8", Timeline::default());
    player.start();
    for tick in 0..3 {
        player.output_mut().tick = tick;
        player.step();
    }
    player.stop();
    for tick in 3..50 {
        player.output_mut().tick = tick;
        player.step();
    }
    player.start();
    for tick in 50..60 {
        player.output_mut().tick = tick;
        player.step();
    }
    // 3 ticks before the pause, 5 more after it
    assert_eq!(
        player.output().events,
        vec![(0, Event::Play(440)), (2, Event::Silence), (55, Event::Play(494))]
    );
}
