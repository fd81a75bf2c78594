use crate::utils::error::Result;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// 建立與 tqdm 相似外觀的進度條；`hidden` 時不輸出任何東西 (測試、非互動)
pub fn progress_bar(total: u64, message: &str, hidden: bool) -> Result<ProgressBar> {
    if hidden {
        return Ok(ProgressBar::with_draw_target(
            Some(total),
            ProgressDrawTarget::hidden(),
        ));
    }

    let style = ProgressStyle::default_bar()
        .template("{msg}: {percent:>3}%|{bar:40.cyan/blue}| {pos}/{len} [{elapsed_precise}<{eta_precise}]")?
        .progress_chars("█▉▊▋▌▍▎▏  ");

    let pb = ProgressBar::new(total);
    pb.set_style(style);
    pb.set_message(message.to_string());
    Ok(pb)
}
