//! View module - terminal output
//!
//! Everything the user sees goes through here; tables are laid out with ratatui widgets
//! rendered into an off-screen buffer and printed as text.
//!
//! - `utils`: Buffer to text conversion and table helpers
//! - `content`: Search result and playlist tables

mod utils;
mod content;

use crossterm::style::Stylize;

use crate::model::{AccountTier, PlaylistInfo, SearchResults};

pub use content::NO_RESULTS;

const SPLASH: &str = r#"
  ____              _   _  __            ____  _
 / ___| _ __   ___ | |_(_)/ _|_   _     |  _ \| |
 \___ \| '_ \ / _ \| __| | |_| | | |____| | | | |
  ___) | |_) | (_) | |_| |  _| |_| |____| |_| | |___
 |____/| .__/ \___/ \__|_|_|  \__, |    |____/|_____|
       |_|                    |___/
"#;

pub struct AppView;

impl AppView {
    pub fn splash() {
        println!("{}", SPLASH.green());
    }

    pub fn account_tier(tier: AccountTier) {
        let notice = match tier {
            AccountTier::Premium => "[ DETECTED PREMIUM ACCOUNT - USING VERY_HIGH QUALITY ]",
            AccountTier::Free => "[ DETECTED FREE ACCOUNT - USING HIGH QUALITY ]",
        };
        println!("{}\n\n", notice.bold());
    }

    pub fn search_results(results: &SearchResults) {
        println!("{}", content::render_search_results(results, utils::terminal_width()));
    }

    pub fn playlists(playlists: &[PlaylistInfo]) {
        println!("{}", content::render_playlists(playlists, utils::terminal_width()));
    }

    pub fn notice(message: &str) {
        println!("{}", message.bold());
    }

    pub fn error(message: &str) {
        eprintln!("{}", message.red());
    }

    pub fn separator() {
        println!();
    }
}
