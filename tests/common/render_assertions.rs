use banded::{RecordingRenderer, RenderCommand};

/// Frames of every text drawn with exactly `text`, in draw order.
pub fn text_frames(renderer: &RecordingRenderer, text: &str) -> Vec<banded::types::Rect> {
    renderer
        .commands()
        .iter()
        .filter_map(|command| match command {
            RenderCommand::Text { text: t, frame, .. } if t == text => Some(*frame),
            _ => None,
        })
        .collect()
}

/// Checks that page boundaries alternate `StartPage`, draws, `FinalizePage`.
pub fn pages_are_balanced(renderer: &RecordingRenderer) -> bool {
    let mut open = false;
    for command in renderer.commands() {
        match command {
            RenderCommand::StartPage if open => return false,
            RenderCommand::StartPage => open = true,
            RenderCommand::FinalizePage if !open => return false,
            RenderCommand::FinalizePage => open = false,
            _ if !open => return false,
            _ => {}
        }
    }
    !open
}

/// Assert that the report displayed a specific text somewhere
#[macro_export]
macro_rules! assert_report_contains_text {
    ($report:expr, $text:expr) => {
        let extracted = $report.text();
        assert!(
            extracted.lines().any(|line| line == $text),
            "Report should display '{}', but displayed:\n{}",
            $text,
            extracted
        );
    };
}

/// Assert the number of pages the renderer started
#[macro_export]
macro_rules! assert_report_page_count {
    ($report:expr, $count:expr) => {
        assert_eq!(
            $report.page_count(),
            $count,
            "Expected {} pages, got {}",
            $count,
            $report.page_count()
        );
    };
}
