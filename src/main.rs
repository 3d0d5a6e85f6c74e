use layout_switcher::utils::tracing::init_tracing;

#[cfg(target_os = "linux")]
fn run() -> layout_switcher::Result<()> {
    use std::sync::{Arc, mpsc};

    use layout_switcher::{
        App, Error, config,
        domain::{
            auto_detector::AutoDetector,
            dictionary::DictionaryService,
            user_dictionary::{LearningSettings, UserDictionary},
        },
        input::RawEvent,
        platform::linux::{self, devices},
    };

    let config = config::load().map_err(|e| Error::Config(e.to_string()))?;

    let dictionary = DictionaryService::builtin();
    let user_dictionary = UserDictionary::load(
        &config.user_dictionary_path()?,
        LearningSettings::from(&config.learning),
    );
    let detector = AutoDetector::new(dictionary, user_dictionary, &config.auto_switch);

    let inputs = devices::discover(&config)?;
    let mut app = App::new(config, linux::platform()?, detector)?;
    app.start_selection_watcher()?;

    let (tx, rx) = mpsc::channel::<(RawEvent, Arc<str>)>();
    let _readers = devices::spawn_readers(inputs, &tx)?;
    drop(tx);

    for (raw, device) in rx {
        app.handle_raw_event(&raw, &device);
    }
    tracing::info!("all input devices closed");
    Ok(())
}

#[cfg(not(target_os = "linux"))]
fn run() -> layout_switcher::Result<()> {
    Err(layout_switcher::Error::PlatformUnavailable(
        "only Linux is supported".into(),
    ))
}

fn main() -> std::process::ExitCode {
    init_tracing();

    match run() {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "layout switcher stopped");
            eprintln!("layout-switcher: {e}");
            std::process::ExitCode::FAILURE
        }
    }
}
