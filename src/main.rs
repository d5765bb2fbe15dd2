use clap::{Arg, Command};
use std::io;
use std::path::PathBuf;
use std::process;

use biosync::auth::password::read_password;
use biosync::gallery::RemoveOutcome;
use biosync::utils::io::{prompt_with_confirmation, read_line};
use biosync::utils::logging::initialize_logging;
use biosync::utils::time::format_timestamp;
use biosync::{AppConfig, FormMode, GalleryStore, Session, SessionError, SubmitOutcome};

fn show_form_options(mode: FormMode) {
    match mode {
        FormMode::Login => {
            println!("\n=== Inicio de Sesión ===");
            println!("1. Ingresar                (or type 'login')");
            println!("2. ¿No tienes cuenta? Regístrate (or type 'toggle')");
        }
        FormMode::Register => {
            println!("\n=== Registro ===");
            println!("1. Registrarse             (or type 'register')");
            println!("2. ¿Ya tienes cuenta? Inicia sesión (or type 'toggle')");
        }
    }
    println!("3. Salir                   (or type 'exit')");
    println!("\nEnter your choice:");
}

fn show_dashboard(gallery: &GalleryStore) {
    println!("\n=== Bienvenido a Biosync ===");
    if gallery.is_empty() {
        println!("No hay imágenes. Sube tus historiales médicos con 'upload <archivo>...'");
    }
    let zoomed_url = gallery.zoomed().map(|h| h.url.clone());
    for (i, handle) in gallery.handles().iter().enumerate() {
        let marker = if zoomed_url.as_deref() == Some(handle.url.as_str()) {
            " [zoom]"
        } else {
            ""
        };
        println!(
            "{}. {} ({}) agregado {}{}",
            i + 1,
            handle.name,
            handle.url,
            format_timestamp(handle.added_at),
            marker
        );
    }
    if let Some(message) = gallery.file_error() {
        println!("{}", message);
    }
    println!("\nCommands: upload <paths...>, list, zoom <n>, unzoom, delete <n>, logout, exit");
}

/// Prompt for the form fields and submit. Returns false when the user wants to quit.
fn form_step(session: &mut Session) -> io::Result<bool> {
    show_form_options(session.mode());
    let choice = read_line()?;

    match choice.trim() {
        "1" | "login" | "register" => {
            println!("Correo electrónico o teléfono:");
            session.set_identifier(read_line()?);
            println!("Contraseña:");
            session.set_password(read_password()?);
            if session.mode() == FormMode::Register {
                println!("Confirmar contraseña:");
                session.set_confirm_password(read_password()?);
            }

            match session.submit() {
                Ok(SubmitOutcome::Registered) => {
                    println!("Registro exitoso. Ahora inicia sesión.")
                }
                Ok(SubmitOutcome::LoggedIn) => println!("Sesión iniciada."),
                Err(SessionError::Validation(errors)) => {
                    for message in errors.messages() {
                        println!("- {}", message);
                    }
                }
                Err(e) => println!("{}", e),
            }
        }
        "2" | "toggle" => {
            session.toggle_mode();
        }
        "3" | "exit" | "quit" => return Ok(false),
        _ => println!("Invalid choice. Please enter 1-3:"),
    }
    Ok(true)
}

fn parse_position(arg: Option<&str>) -> Option<usize> {
    arg?.parse::<usize>().ok()?.checked_sub(1)
}

/// Handle one dashboard command. Returns false when the user wants to quit.
fn dashboard_step(session: &mut Session, gallery: &mut GalleryStore) -> io::Result<bool> {
    show_dashboard(gallery);
    let line = read_line()?;
    let mut words = line.split_whitespace();

    match words.next() {
        Some("upload") => {
            let paths: Vec<&str> = words.collect();
            match gallery.add_paths(&paths) {
                Ok(added) => println!("{} imagen(es) agregada(s).", added),
                Err(e) => println!("{}", e),
            }
        }
        Some("list") | None => {}
        Some("zoom") => match parse_position(words.next()) {
            Some(index) => {
                if let Err(e) = gallery.set_zoom(Some(index)) {
                    println!("{}", e);
                }
            }
            None => println!("Usage: zoom <n>"),
        },
        Some("unzoom") => gallery.clear_zoom(),
        Some("delete") => match parse_position(words.next()) {
            Some(index) => {
                let mut prompt_error = None;
                let result = gallery.remove(index, |handle| {
                    prompt_with_confirmation(
                        &format!("Se eliminará {}.", handle.name),
                        "¿Confirmas?",
                    )
                    .unwrap_or_else(|e| {
                        prompt_error = Some(e);
                        false
                    })
                });
                if let Some(e) = prompt_error {
                    return Err(e);
                }
                match result {
                    Ok(RemoveOutcome::Removed(handle)) => println!("{} eliminada.", handle.name),
                    Ok(RemoveOutcome::Cancelled) => println!("Eliminación cancelada."),
                    Err(e) => println!("{}", e),
                }
            }
            None => println!("Usage: delete <n>"),
        },
        Some("logout") => {
            session.logout();
            println!("Sesión cerrada.");
        }
        Some("exit") | Some("quit") => return Ok(false),
        Some(other) => println!("Unknown command: {}", other),
    }
    Ok(true)
}

fn main() {
    let matches = Command::new("biosync")
        .about("Login form and in-memory image gallery")
        .arg(
            Arg::new("config")
                .long("config")
                .help("JSON configuration file")
                .value_name("PATH")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .help("Write logs to this file instead of stderr")
                .value_name("PATH")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .get_matches();

    let config_path = matches.get_one::<PathBuf>("config");
    let config = match AppConfig::load_or_default(config_path.map(PathBuf::as_path)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    let log_file = matches
        .get_one::<PathBuf>("log-file")
        .cloned()
        .or_else(|| config.log_file.clone());
    if let Err(e) = initialize_logging(log_file.as_deref()) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    let mut session = Session::new(config.policy.clone());
    let mut gallery = GalleryStore::new(config.gallery.clone());

    loop {
        let step = if session.is_logged_in() {
            dashboard_step(&mut session, &mut gallery)
        } else {
            form_step(&mut session)
        };

        match step {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                eprintln!("Error reading input: {}", e);
                process::exit(1);
            }
        }
    }
    println!("¡Hasta pronto!");
}
