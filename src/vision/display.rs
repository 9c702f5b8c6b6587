use anyhow::Result;
use opencv::core::Mat;
use opencv::highgui;

use crate::control::Viewer;

pub struct HighguiViewer {
    title: String,
}

impl HighguiViewer {
    pub fn new(title: &str) -> Result<Self> {
        highgui::named_window(title, highgui::WINDOW_AUTOSIZE)?;
        Ok(Self {
            title: title.to_string(),
        })
    }
}

impl Viewer for HighguiViewer {
    type Image = Mat;

    fn show(&mut self, image: &Mat) -> Result<()> {
        highgui::imshow(&self.title, image)?;
        Ok(())
    }

    fn wait_key(&mut self, delay_ms: i32) -> Result<i32> {
        Ok(highgui::wait_key(delay_ms)?)
    }
}

impl Drop for HighguiViewer {
    fn drop(&mut self) {
        let _ = highgui::destroy_window(&self.title);
    }
}
