use colored::Colorize;

pub mod config;
pub mod diagram;
pub mod handler;
pub mod html;
pub mod text;
pub mod view;

pub use handler::{
    FailureCallback, FormFields, FormInputs, Phase, SharedForm, SubmitEvent, SubmitHandler,
    SubmitOutcome,
};
pub use view::{ResultsRegion, Summary};

pub fn print_banner() {
    let banner = r#"
 __      __.__ __   .__
/  \    /  \__|  | _|__|___________    ____  ____
\   \/\/   /  |  |/ /  \_  __ \__  \ _/ ___\/ __ \
 \        /|  |    <|  ||  | \// __ \\  \__\  ___/
  \__/\  / |__|__|_ \__||__|  (____  /\___  >___  >
       \/          \/              \/     \/    \/
"#;
    println!("{}", banner.bright_cyan().bold());
    println!(
        "  {} {}\n",
        "wikirace".bright_white().bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).bright_black()
    );
}
