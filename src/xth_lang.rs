// Multi-language support module
// Provides localized UI strings for English and Spanish

#[derive(Clone)]
pub struct Assets {
    // Menu items
    pub menu_help: &'static str,
    pub menu_new: &'static str,
    pub menu_solve: &'static str,
    pub menu_records: &'static str,
    pub menu_disks: &'static str,
    pub menu_options: &'static str,
    pub menu_about: &'static str,
    pub menu_exit: &'static str,

    // Disk count modal
    pub disks_prompt: &'static str,     // "Number of disks (1-7):"
    pub disks_error: &'static str,      // shown for out-of-range input

    // Options modal
    pub opt_ascii_icons: &'static str,
    pub opt_show_labels: &'static str,
    pub opt_speed_fmt: &'static str,    // "Solver speed: {} ms"
    pub opt_language: &'static str,

    // Help modal
    pub help_controls: &'static str,
    pub help_click: &'static str,
    pub help_keys: &'static str,
    pub help_cursor: &'static str,
    pub help_cancel: &'static str,
    pub help_goal: &'static str,

    // Records modal
    pub rec_header: &'static str,
    pub rec_no_record: &'static str,
    pub rec_disks_fmt: &'static str,    // "{} disks"

    // Win modal
    pub win_title: &'static str,
    pub win_message: &'static str,
    pub win_moves_fmt: &'static str,    // "Moves: {} (best possible {})"
    pub win_time_fmt: &'static str,     // "Time: {} seconds"
    pub win_record: &'static str,
    pub win_solver: &'static str,

    // Illegal move modal
    pub warn_title: &'static str,
    pub warn_larger: &'static str,
    pub warn_empty: &'static str,

    // About modal
    pub about_description: &'static str,
    pub about_version_fmt: &'static str, // "v{} by {}"

    // Status bar
    pub status_fmt: &'static str,        // " Disks: {}   Moves: {}   Time: {}s "
    pub status_solving_fmt: &'static str, // " Solving... {} moves left "

    // Buttons
    pub btn_ok: &'static str,
    pub btn_close: &'static str,

    // Terminal size messages
    pub tsmsg_line1: &'static str,
    pub tsmsg_line2: &'static str,
    pub tsmsg_title: &'static str,

    // Language names for selection
    pub lang_english: &'static str,
    pub lang_spanish: &'static str,
}

/// Returns English language assets
pub fn english_assets() -> Assets {
    Assets {
        menu_help: "Help",
        menu_new: "New",
        menu_solve: "Solve",
        menu_records: "Records",
        menu_disks: "Disks",
        menu_options: "Options",
        menu_about: "About",
        menu_exit: "Exit",

        disks_prompt: "Number of disks (1-7):",
        disks_error: "Please choose a number between 1 and 7.",

        opt_ascii_icons: "ASCII disks",
        opt_show_labels: "Show disk sizes",
        opt_speed_fmt: "Solver speed: {} ms (+/-)",
        opt_language: "Language",

        help_controls: " Controls:",
        help_click: "  L-Click tower     - pick up / drop disk",
        help_keys: "  1 2 3             - pick up / drop disk",
        help_cursor: "  Arrows + Space    - pick up / drop disk",
        help_cancel: "  R-Click | Bksp    - cancel selection",
        help_goal: " Move every disk to the right tower.",

        rec_header: " Best time in seconds:",
        rec_no_record: "-",
        rec_disks_fmt: "{} disks",

        win_title: "Congratulations",
        win_message: "Puzzle solved!",
        win_moves_fmt: "Moves: {} (best possible {})",
        win_time_fmt: "Time: {} seconds",
        win_record: "New Record!",
        win_solver: "Solved by the computer.",

        warn_title: "Move not allowed",
        warn_larger: "You can't place a larger disk on a smaller one.",
        warn_empty: "That tower has no disk to move.",

        about_description: "A terminal-based Towers of Hanoi game",
        about_version_fmt: "v{} by {}",

        status_fmt: " Disks: {}   Moves: {}   Time: {}s ",
        status_solving_fmt: " Solving... {} moves left ",

        btn_ok: " OK ",
        btn_close: " CLOSE ",

        tsmsg_line1: "Terminal layout too small",
        tsmsg_line2: "Minimum size required: {} x {}",
        tsmsg_title: "Resize needed",

        lang_english: "English",
        lang_spanish: "Español",
    }
}

/// Returns Spanish language assets
pub fn spanish_assets() -> Assets {
    Assets {
        menu_help: "Ayuda",
        menu_new: "Nuevo",
        menu_solve: "Resolver",
        menu_records: "Récords",
        menu_disks: "Discos",
        menu_options: "Opciones",
        menu_about: "Acerca",
        menu_exit: "Salir",

        disks_prompt: "Número de discos (1-7):",
        disks_error: "Por favor, elija un número entre 1 y 7.",

        opt_ascii_icons: "Discos ASCII",
        opt_show_labels: "Mostrar tamaños",
        opt_speed_fmt: "Velocidad: {} ms (+/-)",
        opt_language: "Idioma",

        help_controls: " Controles:",
        help_click: "  Clic izq. torre   - tomar / soltar disco",
        help_keys: "  1 2 3             - tomar / soltar disco",
        help_cursor: "  Flechas + Espacio - tomar / soltar disco",
        help_cancel: "  Clic der. | Borrar - cancelar selección",
        help_goal: " Lleve todos los discos a la torre derecha.",

        rec_header: " Mejor tiempo en segundos:",
        rec_no_record: "-",
        rec_disks_fmt: "{} discos",

        win_title: "Felicidades",
        win_message: "¡Ganaste!",
        win_moves_fmt: "Movimientos: {} (mínimo {})",
        win_time_fmt: "Tiempo: {} segundos",
        win_record: "¡Nuevo récord!",
        win_solver: "Resuelto por la computadora.",

        warn_title: "Movimiento no permitido",
        warn_larger: "No puedes mover un disco más grande encima de uno más pequeño.",
        warn_empty: "Esa torre no tiene discos.",

        about_description: "Torres de Hanoi para la terminal",
        about_version_fmt: "v{} por {}",

        status_fmt: " Discos: {}   Movimientos: {}   Tiempo: {}s ",
        status_solving_fmt: " Resolviendo... faltan {} movimientos ",

        btn_ok: " OK ",
        btn_close: " CERRAR ",

        tsmsg_line1: "La terminal es demasiado pequeña",
        tsmsg_line2: "Tamaño mínimo: {} x {}",
        tsmsg_title: "Redimensionar",

        lang_english: "English",
        lang_spanish: "Español",
    }
}

/// Main language manager struct
/// Holds the current language code and active string assets
pub struct Lang {
    pub current_lang: String,
    pub assets: Assets,
}

/// Normalize a language code ("es-MX" -> "es"); anything unsupported is English
fn normalize(lang_code: &str) -> &'static str {
    if lang_code.to_lowercase().starts_with("es") {
        "es"
    } else {
        "en"
    }
}

impl Lang {
    pub fn new(lang_code: &str) -> Self {
        let code = normalize(lang_code);
        Lang {
            current_lang: code.to_string(),
            assets: assets_for(code),
        }
    }

    /// Switches the current language and reloads all string assets
    pub fn switch_to(&mut self, lang_code: &str) {
        let code = normalize(lang_code);
        self.current_lang = code.to_string();
        self.assets = assets_for(code);
    }

    /// The other supported language, for the options toggle
    pub fn next_code(&self) -> &'static str {
        if self.current_lang == "es" { "en" } else { "es" }
    }

    pub fn lang_name(&self) -> &'static str {
        if self.current_lang == "es" {
            self.assets.lang_spanish
        } else {
            self.assets.lang_english
        }
    }

    /// Format an ISO date (YYYY-MM-DD) according to the current language
    /// English: MM/DD/YYYY, Spanish: DD/MM/YYYY
    pub fn format_date(&self, iso_date: &str) -> String {
        let parts: Vec<&str> = iso_date.split('-').collect();
        if parts.len() != 3 {
            return iso_date.to_string();
        }
        if self.current_lang == "es" {
            format!("{}/{}/{}", parts[2], parts[1], parts[0])
        } else {
            format!("{}/{}/{}", parts[1], parts[2], parts[0])
        }
    }
}

fn assets_for(code: &str) -> Assets {
    if code == "es" {
        spanish_assets()
    } else {
        english_assets()
    }
}

/// Substitute `{}` placeholders in order
pub fn fill(fmt: &str, args: &[&dyn std::fmt::Display]) -> String {
    let mut out = String::with_capacity(fmt.len() + 8);
    let mut rest = fmt;
    let mut args = args.iter();
    while let Some(pos) = rest.find("{}") {
        out.push_str(&rest[..pos]);
        match args.next() {
            Some(a) => out.push_str(&a.to_string()),
            None => out.push_str("{}"),
        }
        rest = &rest[pos + 2..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_codes_normalize() {
        assert_eq!(Lang::new("es-MX").current_lang, "es");
        assert_eq!(Lang::new("zh-CN").current_lang, "en");
        let mut lang = Lang::new("en");
        lang.switch_to(lang.next_code());
        assert_eq!(lang.current_lang, "es");
        assert_eq!(lang.assets.menu_solve, "Resolver");
    }

    #[test]
    fn dates_follow_locale_order() {
        assert_eq!(Lang::new("en").format_date("2026-01-22"), "01/22/2026");
        assert_eq!(Lang::new("es").format_date("2026-01-22"), "22/01/2026");
        assert_eq!(Lang::new("es").format_date("garbage"), "garbage");
    }

    #[test]
    fn fill_substitutes_in_order() {
        assert_eq!(fill("Moves: {} (best possible {})", &[&9, &7]), "Moves: 9 (best possible 7)");
        assert_eq!(fill("{} x {}", &[&80]), "80 x {}");
    }
}
