use beep::beep;
use log::warn;
use std::error::Error;

/// something that can play or silence a single tone
pub trait Sound {
    fn beep(&mut self) -> Result<(), Box<dyn Error>>;
    fn stop(&mut self) -> Result<(), Box<dyn Error>>;
}

const SIMPLEBEEP_PITCH: u16 = 2093; // C

/// PC speaker tone via the `beep` crate
pub struct SimpleBeep;

impl Sound for SimpleBeep {
    fn beep(&mut self) -> Result<(), Box<dyn Error>> {
        beep(SIMPLEBEEP_PITCH)?;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Box<dyn Error>> {
        beep(0)?;
        Ok(())
    }
}

pub struct Mute;

impl Sound for Mute {
    fn beep(&mut self) -> Result<(), Box<dyn Error>> {
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Box<dyn Error>> {
        Ok(())
    }
}

/// Follows the sound timer and only talks to the speaker when the tone
/// should start or stop. Speaker failures are logged; they never stop the
/// machine.
pub struct ToneGate<'a> {
    sound: &'a mut dyn Sound,
    playing: bool,
}

impl<'a> ToneGate<'a> {
    pub fn new(sound: &'a mut dyn Sound) -> Self {
        ToneGate {
            sound,
            playing: false,
        }
    }

    pub fn update(&mut self, active: bool) {
        if active == self.playing {
            return;
        }
        let res = if active {
            self.sound.beep()
        } else {
            self.sound.stop()
        };
        if let Err(e) = res {
            warn!("sound device failed: {}", e);
        }
        self.playing = active;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }
}

impl Drop for ToneGate<'_> {
    fn drop(&mut self) {
        self.update(false);
    }
}
