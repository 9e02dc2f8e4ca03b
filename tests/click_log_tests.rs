// Click logging: social clicks only claim to open a link when one opens.

mod common;

use log::{Level, LevelFilter, Log, Metadata, Record};
use std::sync::Mutex;

struct CaptureLog {
    lines: Mutex<Vec<String>>,
}

impl Log for CaptureLog {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Info
    }

    fn log(&self, record: &Record) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(record.args().to_string());
        }
    }

    fn flush(&self) {}
}

static CAPTURE: CaptureLog = CaptureLog {
    lines: Mutex::new(Vec::new()),
};

fn take_lines() -> Vec<String> {
    std::mem::take(&mut *CAPTURE.lines.lock().unwrap())
}

// One test per binary: the logger is process-global.
#[test]
fn social_click_logs_opening_only_when_a_link_opens() {
    log::set_logger(&CAPTURE).unwrap();
    log::set_max_level(LevelFilter::Info);

    let (mut app, _ui) = common::app();
    let ndc = common::ndc_of(&app, "social_portfolio");
    take_lines();
    app.click(ndc).unwrap();
    let lines = take_lines();
    assert!(lines.iter().any(|l| l.contains("Portfolio clicked")), "{lines:?}");
    assert!(!lines.iter().any(|l| l.contains("opening")), "{lines:?}");

    let mut config = common::bundled();
    config.interactions.open_social_links = true;
    let (mut app, _ui) = common::app_with(config);
    let ndc = common::ndc_of(&app, "social_portfolio");
    take_lines();
    app.click(ndc).unwrap();
    let lines = take_lines();
    assert!(
        lines.iter().any(|l| l == "[pick] opening https://darymura.net"),
        "{lines:?}"
    );
}
