// Interactive menu, used when no subcommand is given
use crate::app::App;
use anyhow::Result;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

const MENU: &str = "\nMain Menu:
1. Parse Profiles
2. Generate Profiles
3. View Beautiful IDs
4. Get Configuration by ID
5. Apply Profile to AnyDesk
6. Exit";

/// Print `label` and read one trimmed line. `None` on end of input.
fn prompt<R: BufRead>(input: &mut R, label: &str) -> Result<Option<String>> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn prompt_number<R: BufRead>(app: &App, input: &mut R, label: &str) -> Result<Option<u64>> {
    let Some(answer) = prompt(input, label)? else {
        return Ok(None);
    };
    match answer.parse::<u64>() {
        Ok(n) => Ok(Some(n)),
        Err(_) => {
            app.output().error(&format!("'{}' is not a number", answer));
            Ok(None)
        }
    }
}

fn generate<R: BufRead>(app: &mut App, input: &mut R) -> Result<()> {
    let default_exe = app.settings().executable();
    let Some(exe) = prompt(
        input,
        &format!(
            "Enter the path to {} (default: {}): ",
            app.settings().process_name,
            default_exe.display()
        ),
    )?
    else {
        return Ok(());
    };
    let exe = if exe.is_empty() {
        default_exe
    } else {
        PathBuf::from(exe)
    };

    let Some(count) = prompt_number(app, input, "Enter the number of IDs to generate: ")? else {
        return Ok(());
    };
    let Some(wait) = prompt_number(app, input, "Enter timeout duration (in seconds): ")? else {
        return Ok(());
    };

    if let Err(e) = app.generate(count as usize, Some(exe), Some(wait)) {
        app.output().error(&format!("{:#}", e));
    }
    Ok(())
}

/// Run the menu loop until "Exit" or end of input
pub fn run<R: BufRead>(app: &mut App, mut input: R) -> Result<()> {
    loop {
        println!("{}", MENU);
        let Some(choice) = prompt(&mut input, "Enter your choice: ")? else {
            return Ok(());
        };

        match choice.as_str() {
            "1" => {
                app.list();
                app.output().success("Profiles parsed successfully!");
            }
            "2" => generate(app, &mut input)?,
            "3" => app.show_beautiful(),
            "4" => {
                let Some(id) = prompt(
                    &mut input,
                    "Enter ID to get configuration (or 'exit' to cancel): ",
                )?
                else {
                    return Ok(());
                };
                if !id.eq_ignore_ascii_case("exit") {
                    if let Err(e) = app.lookup(&id) {
                        app.output().warning(&e.to_string());
                    }
                }
            }
            "5" => {
                let Some(name) = prompt(&mut input, "Enter the profile name to apply (e.g., AD1): ")? else {
                    return Ok(());
                };
                if let Err(e) = app.apply(&name) {
                    app.output().error(&format!("{:#}", e));
                }
            }
            "6" => {
                println!("Exiting...");
                return Ok(());
            }
            _ => app.output().warning("Invalid choice. Please try again."),
        }
    }
}
