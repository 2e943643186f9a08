//! Sound player demo
//!
//! Plays one audio file through a sound handle and exits once the
//! completion event arrives.
//!
//! ```text
//! sound_player <file> [config.toml|config.ron]
//! ```

use sound_engine::prelude::*;
use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

const FRAME: Duration = Duration::from_millis(16);
const MAX_PLAYBACK: Duration = Duration::from_secs(600);

#[derive(Debug, thiserror::Error)]
enum PlayerError {
    #[error("usage: sound_player <file> [config.toml|config.ron]")]
    Usage,
    #[error(transparent)]
    Audio(#[from] AudioError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("playback did not finish within {0:?}")]
    Timeout(Duration),
}

fn main() {
    sound_engine::foundation::logging::init();

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), PlayerError> {
    let mut args = std::env::args().skip(1);
    let file = args.next().ok_or(PlayerError::Usage)?;
    let config = match args.next() {
        Some(path) => SoundConfig::load_from_file(&path)?,
        None => SoundConfig::default(),
    };

    log::info!("Opening audio output...");
    let tasks = TaskQueue::new();
    let mut loader = SoundLoader::with_default_backend(config)?;
    log::debug!("Backend settings: {:?}", loader.config().backend);
    let mut sound = loader.load_file(&file, &tasks)?;

    let finished = Rc::new(Cell::new(false));
    let flag = Rc::clone(&finished);
    let on_complete = Listener::new(move |event: &Event| {
        log::info!("Finished {}", event.get_path().unwrap_or("<unknown>"));
        flag.set(true);
    });
    sound.add_event_listener(SoundEvent::SOUND_COMPLETE, &on_complete, None, false);

    let category = sound.category();
    sound.preload(category, Some(Box::new(move || log::info!("Ready to play ({})", category))));

    sound.set_volume(0.8);
    sound.play_default();
    log::info!("Playing {}", file);

    let started = Instant::now();
    while !finished.get() {
        tasks.run_pending();
        sound.update();

        if started.elapsed() > MAX_PLAYBACK {
            sound.stop();
            return Err(PlayerError::Timeout(MAX_PLAYBACK));
        }
        std::thread::sleep(FRAME);
    }

    log::info!("Played for {:.1}s", started.elapsed().as_secs_f32());
    sound.destroy();
    loader.backend_mut().shutdown();
    Ok(())
}
