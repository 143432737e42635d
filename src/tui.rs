use console::Style;

/// Renders the board field of a FEN-style position string as a colored
/// unicode grid. Squares the string does not describe come out as '?':
/// the renderer trusts the engine's serialization and validates nothing.
pub fn render_position(fen: &str) -> String {
    let placement = fen.split_whitespace().next().unwrap_or(fen);
    let colors =
        [Style::new().color256(233).on_color256(230), Style::new().color256(233).on_color256(222)];

    let mut col_names = String::new();
    col_names.push_str(&format_square(' '));
    for col in 'a'..='h' {
        col_names.push_str(&format_square(col));
    }
    col_names.push_str(&format_square(' '));
    col_names.push('\n');

    let mut color_idx = 0;
    let mut ret = String::new();
    ret.push_str(&col_names);
    for (row_idx, row) in placement.split('/').enumerate() {
        let row_name = char::from_digit(8u32.saturating_sub(row_idx as u32), 10).unwrap_or('?');
        ret.push_str(&format_square(row_name));
        for square in expand_row(row) {
            ret.push_str(&colors[color_idx].apply_to(format_square(square)).to_string());
            color_idx = 1 - color_idx;
        }
        ret.push_str(&format_square(row_name));
        color_idx = 1 - color_idx;
        ret.push('\n');
    }
    ret.push_str(&col_names);
    ret
}

fn expand_row(row: &str) -> Vec<char> {
    let mut squares = Vec::with_capacity(8);
    for ch in row.chars() {
        if let Some(n) = ch.to_digit(10) {
            squares.extend(std::iter::repeat(' ').take(n as usize));
        } else {
            squares.push(to_unicode_char(ch));
        }
    }
    squares
}

fn format_square(ch: char) -> String { format!(" {} ", ch) }

fn to_unicode_char(piece: char) -> char {
    match piece {
        'P' => '♙',
        'N' => '♘',
        'B' => '♗',
        'R' => '♖',
        'Q' => '♕',
        'K' => '♔',
        'p' => '♟',
        'n' => '♞',
        'b' => '♝',
        'r' => '♜',
        'q' => '♛',
        'k' => '♚',
        _ => '?',
    }
}
