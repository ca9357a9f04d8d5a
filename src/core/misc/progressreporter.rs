use indicatif::*;

/// Terminal progress bar.
pub struct ProgressReporter {
    pb: ProgressBar,
}

impl ProgressReporter {
    /// A bar over `total_work` units. Zero means the total is unknown and a
    /// spinner is shown instead.
    pub fn new(total_work: usize, title: &str) -> Self {
        let template = if total_work > 0 {
            format!("{{spinner:.bold.green}} {}: ", title)
                + "[{wide_bar:.cyan}] {pos}/{len} ({elapsed_precise}|{eta_precise}) {msg}"
        } else {
            format!("{{spinner:.bold.green}} {}: ", title) + "{pos} ({elapsed_precise}) {msg}"
        };
        let pb = if total_work > 0 {
            ProgressBar::new(total_work as u64)
        } else {
            ProgressBar::new_spinner()
        };
        let style = ProgressStyle::with_template(&template)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▇▆▅▄▃▂▁  ");
        pb.set_style(style);
        pb.tick();
        ProgressReporter { pb }
    }

    pub fn set_position(&self, pos: usize) {
        self.pb.set_position(pos as u64);
    }

    pub fn set_message(&self, msg: &str) {
        self.pb.set_message(msg.to_string());
    }

    pub fn done(&self) {
        self.pb.finish();
    }
}
