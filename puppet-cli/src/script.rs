use anyhow::{bail, Context, Result};
use puppet_keyboard::keys::{BACKSPACE, ENTER, TAB};
use puppet_keyboard::{KeyPosition, Keymap, ModifierId};

/// Whether a scripted step closes or opens a switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Press,
    Release,
}

/// One line of a replay script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub time_ms: u32,
    pub action: Action,
    pub position: KeyPosition,
}

/// Parse a replay script into steps ordered by time.
///
/// Each line is `<time_ms> press|release <key>`. Blank lines and anything
/// after `#` are ignored. Times must not go backwards.
pub fn parse_script(input: &str, keymap: &Keymap<'_>) -> Result<Vec<Step>> {
    let mut steps: Vec<Step> = Vec::new();

    for (line_num, line) in input.lines().enumerate() {
        let line = line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        let [time, action, key] = fields[..] else {
            bail!(
                "line {}: expected `<time_ms> press|release <key>`, got {} fields",
                line_num + 1,
                fields.len()
            );
        };

        let time_ms: u32 = time
            .parse()
            .with_context(|| format!("line {}: invalid time {:?}", line_num + 1, time))?;

        if let Some(last) = steps.last() {
            if time_ms < last.time_ms {
                bail!(
                    "line {}: time {} is before the previous step at {}",
                    line_num + 1,
                    time_ms,
                    last.time_ms
                );
            }
        }

        let action = match action {
            "press" => Action::Press,
            "release" => Action::Release,
            other => bail!("line {}: unknown action {:?}", line_num + 1, other),
        };

        let position = parse_key(key, keymap)
            .with_context(|| format!("line {}: bad key {:?}", line_num + 1, key))?;

        steps.push(Step {
            time_ms,
            action,
            position,
        });
    }

    Ok(steps)
}

/// Map a key token to the switch that produces it.
fn parse_key(token: &str, keymap: &Keymap<'_>) -> Result<KeyPosition> {
    let modifier = match token {
        "alt" => Some(ModifierId::Alt),
        "sym" => Some(ModifierId::Sym),
        "lshift" => Some(ModifierId::ShiftLeft),
        "rshift" => Some(ModifierId::ShiftRight),
        _ => None,
    };
    if let Some(id) = modifier {
        return keymap
            .find_modifier(id)
            .with_context(|| format!("keymap has no {} key", id.name()));
    }

    if let Some(index) = token.strip_prefix("btn") {
        let index: usize = index.parse().context("invalid button index")?;
        if index >= keymap.button_pins().len() {
            bail!("keymap has {} buttons", keymap.button_pins().len());
        }
        return Ok(KeyPosition::Button(index as u8));
    }

    if let Some((row, col)) = token.strip_prefix('r').and_then(|rest| rest.split_once(":c")) {
        let row: usize = row.parse().context("invalid row")?;
        let col: usize = col.parse().context("invalid column")?;
        if row >= keymap.rows() || col >= keymap.cols() {
            bail!("cell outside the {}x{} matrix", keymap.rows(), keymap.cols());
        }
        return Ok(keymap.matrix_position(row, col));
    }

    let base = match token {
        "space" => b' ',
        "enter" => ENTER,
        "bksp" => BACKSPACE,
        "tab" => TAB,
        _ => match token.as_bytes() {
            // Letters live in the keymap as uppercase.
            [c] => c.to_ascii_uppercase(),
            _ => bail!("unknown key name"),
        },
    };

    keymap
        .find(base)
        .with_context(|| format!("no key produces {:?}", base as char))
}
