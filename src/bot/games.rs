use crate::config::GamesConfig;

/// A game the bot can host in a chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameDoorKind {
    Checkers,
    Chess,
}

#[derive(Debug, Clone, Copy)]
pub struct GameDoor {
    pub kind: GameDoorKind,
    pub title: &'static str,
    pub slug: &'static str,
    /// Command verb (without prefix) that opens a game.
    pub start_verb: &'static str,
    pub aliases: &'static [&'static str],
}

impl GameDoor {
    pub fn display_name(self) -> &'static str {
        self.title
    }
}

pub fn enabled_doors(config: &GamesConfig) -> Vec<GameDoor> {
    let mut doors = Vec::new();
    if config.checkers_enabled {
        doors.push(GameDoor {
            kind: GameDoorKind::Checkers,
            title: "Checkers",
            slug: crate::checkers::GAME_SLUG,
            start_verb: "damas",
            aliases: &["DAMAS", "DRAUGHTS"],
        });
    }
    if config.chess_enabled {
        doors.push(GameDoor {
            kind: GameDoorKind::Chess,
            title: "Chess",
            slug: crate::chess::GAME_SLUG,
            start_verb: "xadrez",
            aliases: &["XADREZ"],
        });
    }
    doors
}

pub fn has_enabled_doors(config: &GamesConfig) -> bool {
    config.checkers_enabled || config.chess_enabled
}

/// Numbered menu of `doors`, with the live game count reported by `active`.
pub fn format_games_menu(
    doors: &[GameDoor],
    active: impl Fn(GameDoorKind) -> usize,
    prefix: &str,
) -> String {
    if doors.is_empty() {
        return "🎮 No games are currently enabled.".to_string();
    }
    let mut out = String::from("🎮 *GAMES MENU*\n\n");
    for (idx, door) in doors.iter().enumerate() {
        out.push_str(&format!(
            "{}) {} ({} active)\n   {}{} @opponent\n",
            idx + 1,
            door.display_name(),
            active(door.kind),
            prefix,
            door.start_verb
        ));
    }
    out.push_str(&format!(
        "\n💡 Use `{prefix}jogos <number>` for a game's commands."
    ));
    out
}

/// Match a menu selector: `2`, `G2`, a title, slug or alias. Case-insensitive.
pub fn resolve_games_command<'a>(selector: &str, doors: &'a [GameDoor]) -> Option<&'a GameDoor> {
    let selector = selector.trim();
    if selector.is_empty() {
        return None;
    }
    for door in doors {
        if door
            .aliases
            .iter()
            .any(|alias| alias.eq_ignore_ascii_case(selector))
        {
            return Some(door);
        }
        if door.title.eq_ignore_ascii_case(selector) || door.slug.eq_ignore_ascii_case(selector) {
            return Some(door);
        }
    }

    let numbered = selector
        .strip_prefix(|c: char| c.eq_ignore_ascii_case(&'g'))
        .unwrap_or(selector)
        .trim();
    if let Ok(idx) = numbered.parse::<usize>() {
        if idx >= 1 && idx <= doors.len() {
            return doors.get(idx - 1);
        }
    }
    None
}
