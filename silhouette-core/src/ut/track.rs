// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use colored::*;
use kdam::{Bar, tqdm};

/// A basic progress bar for tracking files in a batch
pub fn progress_bar(n: usize, desc: &str, verbose: bool) -> Bar {
    if !verbose {
        return tqdm!(disable = true);
    }

    tqdm!(
        total = n,
        force_refresh = false,
        desc = progress_timestamp(desc),
        bar_format =
            "{desc suffix=' '}[{percentage:.0}%] ({rate:.1}/s, eta: {remaining human=true})"
    )
}

/// Prefix a description with a standardized timestamp
pub fn progress_timestamp(desc: &str) -> String {
    let time = chrono::Local::now();
    let ymd = time.format("%Y-%m-%d").to_string();
    let hms = time.format("%H:%M:%S").to_string();

    format!(
        "{} {} | {} {} {} {} {}",
        "[".bold(),
        ymd,
        hms,
        "|".bold(),
        "silhouette".truecolor(86, 156, 214).bold(),
        "]".bold(),
        desc,
    )
}

/// Print timestamped statements to console
pub fn progress_log(desc: &str, verbose: bool) {
    if !verbose {
        return;
    }

    println!("{}", progress_timestamp(desc));
}

/// Print timestamped statements to stderr, keeping stdout free for data
pub fn progress_elog(desc: &str, verbose: bool) {
    if !verbose {
        return;
    }

    eprintln!("{}", progress_timestamp(desc));
}

/// Print a timestamped warning to console
pub fn progress_warn(desc: &str, verbose: bool) {
    progress_log(&format!("{} {}", "WARNING:".yellow().bold(), desc), verbose);
}

/// Format numbers to readable thousands format
///
/// # Examples
///
/// ```
/// use silhouette_core::ut::track::thousands_format;
///
/// assert_eq!(thousands_format(512), "512");
/// assert_eq!(thousands_format(1234), "1234");
/// assert_eq!(thousands_format(1234567), "1,234,567");
/// ```
pub fn thousands_format<T>(number: T) -> String
where
    T: std::fmt::Display,
{
    let number = number.to_string();
    if number.len() <= 4 {
        return number;
    }

    let digits: Vec<char> = number.chars().collect();
    let offset = digits.len() % 3;

    let mut formatted = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (i + 3 - offset) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(*c);
    }

    formatted
}
