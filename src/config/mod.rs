pub mod job;
pub mod merged;
pub mod settings;

use std::path::Path;

use tracing::debug;

use crate::error::PietroError;
use settings::Settings;

/// File name of the per-directory settings next to a job file.
pub const SETTINGS_FILE: &str = "settings.yaml";

/// ジョブファイルと同じディレクトリの `settings.yaml` を読み込む。
///
/// `docker_image`（実行するサンドボックス）、`concurrency`（1文書あたりの同時合成数）、
/// `best_effort`、`output_root` を既定値として与え、各ジョブで上書きできる。
/// ファイルが無ければ [`Settings::default`] を返す。
pub fn load_settings_for_job(job_file_path: &Path) -> crate::error::Result<Settings> {
    let Some(dir) = job_file_path.parent() else {
        return Err(PietroError::config(format!(
            "cannot determine directory of job file {}",
            job_file_path.display()
        )));
    };

    let settings_path = dir.join(SETTINGS_FILE);
    if !settings_path.is_file() {
        debug!(dir = %dir.display(), "no settings.yaml, using defaults");
        return Ok(Settings::default());
    }
    let settings = Settings::from_file(&settings_path)?;
    debug!(
        path = %settings_path.display(),
        docker_image = %settings.docker_image,
        concurrency = settings.concurrency,
        "settings loaded"
    );
    Ok(settings)
}
