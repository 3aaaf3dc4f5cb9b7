use thirtyfour::{
    error::WebDriverResult, ChromiumLikeCapabilities, DesiredCapabilities, WebDriver,
};

use crate::configuration::{BrowserKind, WebDriverSettings};

pub struct Droid {
    pub driver: WebDriver,
}

impl Droid {
    pub async fn new(settings: &WebDriverSettings) -> WebDriverResult<Self> {
        log::info!(
            "Starting {:?} session on {}",
            settings.browser,
            settings.server_url
        );

        let driver = match settings.browser {
            BrowserKind::Firefox => {
                let mut caps = DesiredCapabilities::firefox();
                if settings.headless {
                    caps.set_headless()?;
                }
                WebDriver::new(settings.server_url.as_str(), caps).await?
            }
            BrowserKind::Chrome => {
                let mut caps = DesiredCapabilities::chrome();
                if settings.headless {
                    caps.set_headless()?;
                }
                WebDriver::new(settings.server_url.as_str(), caps).await?
            }
        };
        driver.maximize_window().await?;

        Ok(Droid { driver })
    }

    pub async fn quit(self) -> WebDriverResult<()> {
        log::info!("Closing browser session");
        self.driver.quit().await
    }
}
