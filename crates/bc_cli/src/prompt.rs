use std::io::{self, BufRead, Write};

use bc_core::Prompt;

/// stdin/stdout prompt surface. Prompts are written without a trailing
/// newline so the cursor stays on the question line.
pub struct ConsolePrompt;

impl Prompt for ConsolePrompt {
    fn read_line(&mut self, prompt: &str) -> String {
        print!("{prompt}");
        let _ = io::stdout().flush();
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line).is_err() {
            return String::new();
        }
        line.trim_end_matches(['\r', '\n']).to_string()
    }

    fn say(&mut self, line: &str) {
        println!("{line}");
    }
}
