use crate::{TermInt, Coords};
use std::{io::{Stdout, Write, stdout}, time::Duration};

use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::style::Color;
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyEvent, read, poll};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glyph {
    pub ch: char,
    pub color: Color,
}

impl Glyph {
    pub const BLANK: Glyph = Glyph { ch: ' ', color: Color::Reset };

    pub fn new(ch: char, color: Color) -> Self {
        Glyph { ch, color }
    }
}

pub enum TermEvent {
    Key(KeyEvent),
    Resized,
}

pub struct TermManager {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
    screen: Vec<Glyph>,
    current_msg: Option<Message>,
    active: bool,
}

struct Message {
    top_left: Coords,
    width: TermInt,
    height: TermInt,
}

impl TermManager {
    pub fn new() -> crossterm::Result<Self> {
        let (width, height) = terminal::size()?;
        let stdout = stdout();
        let screen = vec![Glyph::BLANK; width as usize * height as usize];
        Ok(TermManager { width, height, stdout, screen, current_msg: None, active: false })
    }

    pub fn setup(&mut self) -> crossterm::Result<()> {
        execute!(self.stdout, EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)?;
        self.active = true;
        Ok(())
    }

    /// Safe to call more than once; also runs on drop.
    pub fn restore(&mut self) -> crossterm::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        terminal::disable_raw_mode()?;
        execute!(self.stdout, style::ResetColor, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)
    }

    /// Drains pending input without blocking. Resizes are applied here and
    /// reported so the caller can redraw.
    pub fn read_events_queue(&mut self) -> crossterm::Result<Vec<TermEvent>> {
        let mut events = vec![];

        while poll(Duration::from_millis(1))? {
            match read()? {
                Event::Key(ev) => events.push(TermEvent::Key(ev)),
                Event::Resize(w, h) => {
                    self.resize(w, h);
                    events.push(TermEvent::Resized);
                }
                _ => {}
            }
        }

        Ok(events)
    }

    pub fn get_terminal_size(&self) -> Coords {
        (self.width, self.height)
    }

    pub fn draw_borders(&mut self, top_left: Coords, size: Coords) {
        let (width, height) = size;
        let (x0, y0) = top_left;
        let end_x = x0 + width - 1;
        let end_y = y0 + height - 1;

        for x in x0..=end_x {
            let ch = if x == x0 || x == end_x {'+'} else {'-'};
            self.print_at((x, y0), Glyph::new(ch, Color::Reset));
            self.print_at((x, end_y), Glyph::new(ch, Color::Reset));
        }

        for y in y0 + 1..end_y {
            self.print_at((x0, y), Glyph::new('|', Color::Reset));
            self.print_at((end_x, y), Glyph::new('|', Color::Reset));
        }
    }

    /// Boxed message centered on `center`. Whatever it covers is kept in the
    /// screen buffer and comes back on `hide_message`.
    pub fn show_message<S: AsRef<str>>(&mut self, lines: &[S], center: Coords) {
        if self.has_message() {
            self.hide_message();
        }

        let msg_height = (lines.len() + 2) as TermInt;
        let msg_width = (lines.iter().map(|x| x.as_ref().chars().count()).max().unwrap_or(0) + 2) as TermInt;
        let top_left = (center.0.saturating_sub(msg_width / 2), center.1.saturating_sub(msg_height / 2));

        // Print the top and bottom empty lines
        for y in [top_left.1, top_left.1 + msg_height - 1].iter() {
            for x_diff in 0..msg_width {
                self.print_at_no_save((top_left.0 + x_diff, *y), Glyph::BLANK);
            }
        }

        // Print the message lines
        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line.as_ref(), width = msg_width as usize);
            let y = top_left.1 + i as TermInt + 1;
            for (x_diff, ch) in padded_line.chars().enumerate() {
                self.print_at_no_save((top_left.0 + x_diff as TermInt, y), Glyph::new(ch, Color::White));
            }
        }

        self.current_msg = Some(Message::new(msg_width, msg_height, top_left));
    }

    pub fn hide_message(&mut self) {
        let msg = match self.current_msg.take() {
            Some(msg) => msg,
            None => return,
        };
        let top_left = msg.top_left();

        // Restore the content from the screen buffer
        for y_diff in 0..msg.height() {
            for x_diff in 0..msg.width() {
                let pos = (top_left.0 + x_diff, top_left.1 + y_diff);
                if let Some(idx) = self.index(pos) {
                    let glyph = self.screen[idx];
                    self.print_at_no_save(pos, glyph);
                }
            }
        }
    }

    /// Writes through the screen buffer; unchanged glyphs are not re-sent and
    /// glyphs under a message are only stored.
    pub fn print_at(&mut self, pos: Coords, glyph: Glyph) {
        let idx = match self.index(pos) {
            Some(idx) => idx,
            None => return,
        };
        if self.screen[idx] == glyph {
            return;
        }
        self.screen[idx] = glyph;

        if !self.covered_by_message(pos) {
            self.emit(pos, glyph);
        }
    }

    pub fn print_str_at(&mut self, pos: Coords, text: &str, color: Color) {
        for (i, ch) in text.chars().enumerate() {
            self.print_at((pos.0 + i as TermInt, pos.1), Glyph::new(ch, color));
        }
    }

    pub fn clear(&mut self) -> crossterm::Result<()> {
        execute!(self.stdout, style::ResetColor, terminal::Clear(ClearType::All))?;
        self.screen = vec![Glyph::BLANK; self.width as usize * self.height as usize];
        self.current_msg = None;
        Ok(())
    }

    pub fn flush(&mut self) -> crossterm::Result<()> {
        self.stdout.flush()?;
        Ok(())
    }

    pub fn has_message(&self) -> bool {
        self.current_msg.is_some()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn resize(&mut self, width: TermInt, height: TermInt) {
        self.width = width;
        self.height = height;
        self.screen = vec![Glyph::BLANK; width as usize * height as usize];
        self.current_msg = None;
    }

    fn index(&self, pos: Coords) -> Option<usize> {
        if pos.0 >= self.width || pos.1 >= self.height {
            return None;
        }
        Some(self.width as usize * pos.1 as usize + pos.0 as usize)
    }

    fn covered_by_message(&self, pos: Coords) -> bool {
        self.current_msg.as_ref().map_or(false, |msg| {
            let (x, y) = msg.top_left();
            (x..x + msg.width()).contains(&pos.0) && (y..y + msg.height()).contains(&pos.1)
        })
    }

    fn print_at_no_save(&mut self, pos: Coords, glyph: Glyph) {
        // To be used for printing messages, where we don't wanna overwrite our
        // local buffer to restore it when the message is hidden
        if self.index(pos).is_some() {
            self.emit(pos, glyph);
        }
    }

    fn emit(&mut self, pos: Coords, glyph: Glyph) {
        // A failed write only loses a frame; the next redraw repaints it
        let _ = queue!(
            self.stdout,
            cursor::MoveTo(pos.0, pos.1),
            style::SetForegroundColor(glyph.color),
            style::Print(glyph.ch)
        );
    }
}

impl Drop for TermManager {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

impl Message {
    pub fn new(width: TermInt, height: TermInt, top_left: Coords) -> Self {
        Message { width, height, top_left }
    }

    pub fn width(&self) -> TermInt {
        self.width
    }

    pub fn height(&self) -> TermInt {
        self.height
    }

    pub fn top_left(&self) -> Coords {
        self.top_left
    }
}
