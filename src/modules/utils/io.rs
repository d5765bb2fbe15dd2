use std::io::{self, Write};

/// Read a line from stdin without its line ending. Other whitespace is kept.
pub fn read_line() -> io::Result<String> {
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(strip_line_ending(&input).to_string())
}

fn strip_line_ending(input: &str) -> &str {
    input.trim_end_matches(['\r', '\n'])
}

/// Ask a yes/no question; anything but "y"/"yes" declines
pub fn prompt_with_confirmation(prompt: &str, confirmation: &str) -> io::Result<bool> {
    println!("{}", prompt);
    print!("{} (y/n): ", confirmation);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(is_affirmative(&input))
}

fn is_affirmative(input: &str) -> bool {
    matches!(
        input.trim().to_lowercase().as_str(),
        "y" | "yes" | "s" | "si" | "sí"
    )
}
