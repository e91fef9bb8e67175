use crossterm::event::{poll, read, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal;
use log::warn;
use std::collections::HashMap;
use std::io;
use std::time::{Duration, Instant};

/// the hex keypad laid over the left-hand side of a qwerty keyboard:
///   1 2 3 C      1 2 3 4
///   4 5 6 D  <-  q w e r
///   7 8 9 E      a s d f
///   A 0 B F      z x c v
const CHIP8_CONVENTIONAL_KEYMAP: [(char, u8); 16] = [
    ('x', 0x00),
    ('1', 0x01),
    ('2', 0x02),
    ('3', 0x03),
    ('q', 0x04),
    ('w', 0x05),
    ('e', 0x06),
    ('a', 0x07),
    ('s', 0x08),
    ('d', 0x09),
    ('z', 0x0a),
    ('c', 0x0b),
    ('4', 0x0c),
    ('r', 0x0d),
    ('f', 0x0e),
    ('v', 0x0f),
];

/// terminals send no key-up events, so a key counts as held for this long
/// after its last press or auto-repeat
const KEY_HOLD: Duration = Duration::from_millis(200);

/// reads keypresses into a snapshot of the 16-key latch
pub trait Input {
    /// which of the 16 keys are currently held
    fn keys(&mut self) -> Result<[bool; 16], io::Error>;

    /// has the user asked to leave
    fn quit_requested(&self) -> bool;
}

/// Input read from the terminal with crossterm. Puts the terminal into raw
/// mode for as long as it lives.
pub struct TermInput {
    keymap: HashMap<char, u8>,
    last_seen: [Option<Instant>; 16],
    quit: bool,
}

impl TermInput {
    pub fn new() -> Result<Self, io::Error> {
        terminal::enable_raw_mode()?;
        Ok(TermInput {
            keymap: HashMap::from(CHIP8_CONVENTIONAL_KEYMAP),
            last_seen: [None; 16],
            quit: false,
        })
    }

    fn read_events(&mut self) -> Result<(), io::Error> {
        while poll(Duration::from_millis(0))? {
            if let Event::Key(evt) = read()? {
                self.handle_key(evt, Instant::now());
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, evt: KeyEvent, now: Instant) {
        match evt.code {
            KeyCode::Esc => self.quit = true,
            KeyCode::Char('c') if evt.modifiers.contains(KeyModifiers::CONTROL) => {
                self.quit = true
            }
            KeyCode::Char(key) => match self.keymap.get(&key.to_ascii_lowercase()) {
                Some(&mapped_key) => self.last_seen[mapped_key as usize] = Some(now),
                None => warn!("can't map {:?} to a CHIP-8 key", key),
            },
            _ => {}
        }
    }

    fn held(&self, now: Instant) -> [bool; 16] {
        let mut keys = [false; 16];
        for (held, seen) in keys.iter_mut().zip(self.last_seen.iter()) {
            *held = matches!(seen, Some(t) if now.duration_since(*t) < KEY_HOLD);
        }
        keys
    }
}

impl Drop for TermInput {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

impl Input for TermInput {
    fn keys(&mut self) -> Result<[bool; 16], io::Error> {
        self.read_events()?;
        Ok(self.held(Instant::now()))
    }

    fn quit_requested(&self) -> bool {
        self.quit
    }
}

/// dummy Input implementation for testing
pub struct DummyInput {
    keys: [bool; 16],
    quit_after: Option<usize>,
    polls: usize,
}

impl DummyInput {
    /// report the given keys as held, forever
    pub fn new(keys: &[u8]) -> Self {
        let mut held = [false; 16];
        for k in keys {
            held[(*k & 0xf) as usize] = true;
        }
        DummyInput {
            keys: held,
            quit_after: None,
            polls: 0,
        }
    }

    /// ask to quit once polled `polls` times
    pub fn quit_after(mut self, polls: usize) -> Self {
        self.quit_after = Some(polls);
        self
    }
}

impl Input for DummyInput {
    fn keys(&mut self) -> Result<[bool; 16], io::Error> {
        self.polls += 1;
        Ok(self.keys)
    }

    fn quit_requested(&self) -> bool {
        matches!(self.quit_after, Some(n) if self.polls >= n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term_input() -> TermInput {
        // NB. built by hand so raw mode is left alone during tests
        TermInput {
            keymap: HashMap::from(CHIP8_CONVENTIONAL_KEYMAP),
            last_seen: [None; 16],
            quit: false,
        }
    }

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    #[test]
    fn test_keymap_covers_keypad() {
        let m = HashMap::from(CHIP8_CONVENTIONAL_KEYMAP);
        let mut mapped: Vec<u8> = m.values().copied().collect();
        mapped.sort_unstable();
        assert_eq!(mapped, (0..16).collect::<Vec<u8>>());
    }

    #[test]
    fn test_key_held_then_released() {
        let mut i = term_input();
        let t = Instant::now();
        i.handle_key(key('v'), t);
        i.handle_key(key('Q'), t);
        let held = i.held(t + Duration::from_millis(50));
        assert!(held[0xf] && held[0x4]);
        assert_eq!(held.iter().filter(|k| **k).count(), 2);
        assert!(!i.held(t + KEY_HOLD)[0xf]);
    }

    #[test]
    fn test_escape_quits() {
        let mut i = term_input();
        i.handle_key(key('p'), Instant::now());
        assert!(!i.quit_requested());
        i.handle_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE), Instant::now());
        assert!(i.quit_requested());
    }

    #[test]
    fn test_dummy_input() -> Result<(), io::Error> {
        let mut d = DummyInput::new(&[0x1, 0xa]).quit_after(2);
        let keys = d.keys()?;
        assert!(keys[0x1] && keys[0xa] && !keys[0x0]);
        assert!(!d.quit_requested());
        d.keys()?;
        assert!(d.quit_requested());
        Ok(())
    }
}
