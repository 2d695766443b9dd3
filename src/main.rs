// segptr: relocatable fancy pointers with a segment inspector

use std::io;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use segptr::demo::{Demo, DEFAULT_HISTORY_LIMIT};
use segptr::ui::App;

const DEFAULT_ITEMS: usize = 11;

fn print_usage(program_name: &str) {
    eprintln!("Usage: {} [--plain] [--items N]", program_name);
    eprintln!();
    eprintln!("  --plain     Run one relocation round and print the log instead of the TUI");
    eprintln!("  --items N   Number of strings placed in each container (default {})", DEFAULT_ITEMS);
    eprintln!("  --help      Show this message");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let program_name = args.first().map(|s| s.as_str()).unwrap_or("segptr");

    let mut plain = false;
    let mut items = DEFAULT_ITEMS;
    let mut rest = args.iter().skip(1);
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--plain" => plain = true,
            "--items" => match rest.next().map(|n| n.parse::<usize>()) {
                Some(Ok(n)) => items = n,
                _ => {
                    eprintln!("Error: --items needs a non-negative number");
                    print_usage(program_name);
                    std::process::exit(1);
                }
            },
            "--help" | "-h" => {
                print_usage(program_name);
                return Ok(());
            }
            other => {
                eprintln!("Error: unknown argument '{}'", other);
                print_usage(program_name);
                std::process::exit(1);
            }
        }
    }

    eprintln!("Building containers with {} item(s) each...", items);
    let mut demo = match Demo::new(items, DEFAULT_HISTORY_LIMIT) {
        Ok(demo) => demo,
        Err(e) => {
            eprintln!("Allocation error: {}", e);
            std::process::exit(1);
        }
    };

    if plain {
        let intact = demo.run_relocation_round();
        for line in demo.log.get_output() {
            println!("{}", line);
        }
        if !intact {
            eprintln!("Error: relocation did not preserve the containers");
            std::process::exit(1);
        }
        return Ok(());
    }

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(demo);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
