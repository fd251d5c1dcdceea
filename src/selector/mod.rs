//! Paginated interactive item selector.
//!
//! A [`Selector`] owns an ordered list of [`Item`]s and a [`Pager`], prints
//! one page at a time and reads single-line commands until a command or an
//! item action asks it to stop. Numeric input selects an item by its
//! position on the current page; the rest of the line goes through a mapping
//! function that builds the argument bundle handed to the item's action.

pub mod command;
pub mod pager;

pub use command::{CommandSpec, Flow};
pub use pager::Pager;

use crate::error::Result;
use command::{builtins, split_command, split_ordinal};
use log::debug;
use std::io::{self, BufRead, Write};

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_PROMPT: &str = "> ";
pub const DEFAULT_USAGE: &str =
    "Enter a cmd starts with digit then item will be ran.";
pub const DEFAULT_INTRO: &str = "Item Selector (press \"help\" for usage)\n\
     ===========================================\n";

/// Display text of an item, resolved fresh on every render.
pub enum ItemText {
    Literal(String),
    Computed(Box<dyn Fn() -> String>),
}

impl ItemText {
    pub fn resolve(&self) -> String {
        match self {
            ItemText::Literal(text) => text.clone(),
            ItemText::Computed(produce) => produce(),
        }
    }
}

impl From<String> for ItemText {
    fn from(text: String) -> Self {
        ItemText::Literal(text)
    }
}

impl From<&str> for ItemText {
    fn from(text: &str) -> Self {
        ItemText::Literal(text.to_string())
    }
}

/// Input and output of a running session. Item actions get it so that a
/// nested selector keeps reading from the same input stream.
pub struct Session<'a> {
    input: &'a mut dyn BufRead,
    out: &'a mut dyn Write,
}

impl<'a> Session<'a> {
    pub fn new(input: &'a mut dyn BufRead, out: &'a mut dyn Write) -> Self {
        Self { input, out }
    }

    /// Read one line; `Ok(0)` at end of input.
    pub fn read_line(&mut self, line: &mut String) -> io::Result<usize> {
        self.input.read_line(line)
    }
}

impl Write for Session<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.out.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// Returns `true` to end the selector session.
pub type Action<A> = Box<dyn Fn(A, &mut Session<'_>) -> Result<bool>>;

pub struct Item<A = String> {
    text: ItemText,
    action: Action<A>,
}

impl<A> Item<A> {
    pub fn new(
        text: impl Into<ItemText>,
        action: impl Fn(A, &mut Session<'_>) -> Result<bool> + 'static,
    ) -> Self {
        Self {
            text: text.into(),
            action: Box::new(action),
        }
    }

    pub fn computed(
        text: impl Fn() -> String + 'static,
        action: impl Fn(A, &mut Session<'_>) -> Result<bool> + 'static,
    ) -> Self {
        Self {
            text: ItemText::Computed(Box::new(text)),
            action: Box::new(action),
        }
    }

    pub fn text(&self) -> String {
        self.text.resolve()
    }

    pub fn run(&self, args: A, session: &mut Session<'_>) -> Result<bool> {
        (self.action)(args, session)
    }
}

pub struct Selector<A = String> {
    items: Vec<Item<A>>,
    pager: Pager,
    map_args: Box<dyn Fn(&str) -> A>,
    prompt: String,
    intro: String,
    usage: String,
    commands: Vec<CommandSpec>,
}

impl Selector<String> {
    /// Selector whose actions receive the trailing fragment verbatim.
    pub fn new(items: Vec<Item<String>>) -> Self {
        Self::with_mapper(items, |after| after.to_string())
    }
}

impl<A> Selector<A> {
    pub fn with_mapper(
        items: Vec<Item<A>>,
        map_args: impl Fn(&str) -> A + 'static,
    ) -> Self {
        let pager = Pager::new(items.len(), DEFAULT_PAGE_SIZE, false);
        Self {
            items,
            pager,
            map_args: Box::new(map_args),
            prompt: DEFAULT_PROMPT.to_string(),
            intro: DEFAULT_INTRO.to_string(),
            usage: DEFAULT_USAGE.to_string(),
            commands: builtins(),
        }
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.pager.set_page_size(page_size);
        self
    }

    pub fn reverse(mut self, reverse: bool) -> Self {
        self.pager.set_reverse(reverse);
        self
    }

    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn intro(mut self, intro: impl Into<String>) -> Self {
        self.intro = intro.into();
        self
    }

    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }

    /// Add a command, replacing any existing one with the same name.
    pub fn register(&mut self, spec: CommandSpec) {
        match self.commands.iter_mut().find(|c| c.name == spec.name) {
            Some(slot) => *slot = spec,
            None => self.commands.push(spec),
        }
    }

    pub fn with_command(mut self, spec: CommandSpec) -> Self {
        self.register(spec);
        self
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    pub fn items(&self) -> &[Item<A>] {
        &self.items
    }

    pub fn items_in_page(&self) -> &[Item<A>] {
        &self.items[self.pager.item_range()]
    }

    /// Item lines plus the `[page x/y]` line. Reverse mode flips the line
    /// order (page info first) but ordinals stay bound to their items.
    pub fn render_page(&self) -> String {
        let mut lines: Vec<String> = self
            .items_in_page()
            .iter()
            .enumerate()
            .map(|(idx, item)| format!("{:>2}) {}", idx + 1, item.text()))
            .collect();
        let page_info = format!(
            "[page {}/{}]",
            self.pager.page(),
            self.pager.page_count()
        );
        if self.pager.is_reversed() {
            lines.reverse();
            lines.insert(0, page_info);
        } else {
            lines.push(page_info);
        }
        lines.join("\n")
    }

    /// Run against the process terminal.
    pub fn run(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.run_with(stdin.lock(), stdout.lock())
    }

    pub fn run_with<R: BufRead, W: Write>(
        &mut self,
        mut input: R,
        mut out: W,
    ) -> Result<()> {
        self.run_in(&mut Session::new(&mut input, &mut out))
    }

    /// Print the intro and first page, then handle lines from the session
    /// until a command stops it or input runs out.
    pub fn run_in(&mut self, session: &mut Session<'_>) -> Result<()> {
        writeln!(session, "{}{}", self.intro, self.render_page())?;
        loop {
            write!(session, "{}", self.prompt)?;
            session.flush()?;
            let mut line = String::new();
            if session.read_line(&mut line)? == 0 {
                writeln!(session)?;
                break;
            }
            if self.execute(&line, session)? == Flow::Stop {
                break;
            }
        }
        session.flush()?;
        Ok(())
    }

    /// Handle one input line, redrawing the page afterwards unless the
    /// command prints its own output or the session stops.
    pub fn execute(&mut self, line: &str, session: &mut Session<'_>) -> Result<Flow> {
        let line = line.trim();
        let (flow, redraw) = self.dispatch(line, session)?;
        if flow == Flow::Continue && redraw {
            writeln!(session)?;
            writeln!(session, "{}", self.render_page())?;
        }
        Ok(flow)
    }

    fn dispatch(&mut self, line: &str, session: &mut Session<'_>) -> Result<(Flow, bool)> {
        if line.is_empty() {
            return Ok((Flow::Continue, true));
        }
        if let Some(topic) = line.strip_prefix('?') {
            self.print_help(topic.trim(), session)?;
            return Ok((Flow::Continue, false));
        }
        if line.starts_with('!') {
            writeln!(session, "[cancel]: command \"{line}\" not found.")?;
            return Ok((Flow::Continue, false));
        }

        let (name, arg) = split_command(line);
        if name == "help" {
            self.print_help(arg, session)?;
            return Ok((Flow::Continue, false));
        }
        if let Some(spec) = self.commands.iter().find(|c| c.name == name) {
            debug!("selector command {name} {arg:?}");
            let flow = (spec.handler)(&mut self.pager, arg, session)?;
            return Ok((flow, spec.redraw));
        }

        let flow = self.run_item(line, session)?;
        Ok((flow, true))
    }

    fn run_item(&self, line: &str, session: &mut Session<'_>) -> Result<Flow> {
        let Some((ordinal, after)) = split_ordinal(line) else {
            writeln!(session, "[cancel]: command \"{line}\" not found.")?;
            return Ok(Flow::Continue);
        };
        let item = ordinal
            .checked_sub(1)
            .and_then(|idx| self.items_in_page().get(idx));
        let Some(item) = item else {
            writeln!(
                session,
                "[cancel]: index \"{ordinal}\" out of range, please try again."
            )?;
            return Ok(Flow::Continue);
        };
        debug!(
            "selector run item {ordinal} on page {} with {after:?}",
            self.pager.page()
        );
        let args = (self.map_args)(after);
        Ok(Flow::from(item.run(args, session)?))
    }

    fn print_help(&self, topic: &str, out: &mut dyn Write) -> Result<()> {
        if topic.is_empty() {
            writeln!(out, "{}", self.usage)?;
            writeln!(out)?;
            writeln!(out, "Commands:")?;
            writeln!(out, "  {:<8} {}", "help", "Show this message or help <command>")?;
            for spec in &self.commands {
                let first = spec.summary.lines().next().unwrap_or_default();
                writeln!(out, "  {:<8} {}", spec.name, first)?;
            }
            return Ok(());
        }
        match self.commands.iter().find(|c| c.name == topic) {
            Some(spec) => writeln!(out, "{}", spec.summary)?,
            None if topic == "usage" => writeln!(out, "{}", self.usage)?,
            None => writeln!(out, "*** No help on {topic}")?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::io::Cursor;
    use std::rc::Rc;

    fn numbered(count: usize) -> Vec<Item<String>> {
        (1..=count)
            .map(|i| Item::new(format!("item {i}"), |_, _| Ok(false)))
            .collect()
    }

    fn drive<A>(selector: &mut Selector<A>, script: &str) -> String {
        let mut out = Vec::new();
        selector.run_with(Cursor::new(script.to_string()), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn exec<A>(selector: &mut Selector<A>, line: &str) -> (Flow, String) {
        let mut input = io::empty();
        let mut out = Vec::new();
        let flow = selector
            .execute(line, &mut Session::new(&mut input, &mut out))
            .unwrap();
        (flow, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_render_forward_page() {
        let selector = Selector::new(numbered(3));
        assert_eq!(
            selector.render_page(),
            " 1) item 1\n 2) item 2\n 3) item 3\n[page 1/1]"
        );
    }

    #[test]
    fn test_render_reverse_keeps_ordinals() {
        let selector = Selector::new(numbered(3)).reverse(true);
        assert_eq!(
            selector.render_page(),
            "[page 1/1]\n 3) item 3\n 2) item 2\n 1) item 1"
        );
        assert_eq!(selector.items()[0].text(), "item 1");
    }

    #[test]
    fn test_render_empty_list() {
        let selector = Selector::new(Vec::new());
        assert_eq!(selector.pager().page_count(), 1);
        assert_eq!(selector.render_page(), "[page 1/1]");
    }

    #[test]
    fn test_computed_text_is_not_cached() {
        let counter = Rc::new(Cell::new(0));
        let seen = Rc::clone(&counter);
        let item: Item<String> = Item::computed(
            move || {
                seen.set(seen.get() + 1);
                format!("render #{}", seen.get())
            },
            |_, _| Ok(false),
        );
        let selector = Selector::new(vec![item]);
        assert!(selector.render_page().contains("render #1"));
        assert!(selector.render_page().contains("render #2"));
        assert_eq!(counter.get(), 2);
    }

    #[test]
    fn test_goto_then_size_keeps_item_21() {
        let mut selector = Selector::new(numbered(25));
        assert_eq!(selector.pager().page_count(), 3);
        exec(&mut selector, "goto 3");
        exec(&mut selector, "size 5");
        assert_eq!(selector.pager().page(), 5);
        let texts: Vec<String> =
            selector.items_in_page().iter().map(Item::text).collect();
        assert!(texts.contains(&"item 21".to_string()));
    }

    #[test]
    fn test_goto_non_numeric_is_noop() {
        let mut selector = Selector::new(numbered(25));
        exec(&mut selector, "goto 2");
        let (flow, _) = exec(&mut selector, "goto abc");
        assert_eq!(flow, Flow::Continue);
        assert_eq!(selector.pager().page(), 2);
    }

    #[test]
    fn test_default_mapper_passes_fragment() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let items: Vec<Item<String>> = (1..=6)
            .map(|i| {
                let seen = Rc::clone(&seen);
                Item::new(format!("n{i}"), move |after: String, _| {
                    seen.borrow_mut().push((i, after));
                    Ok(true)
                })
            })
            .collect();
        let mut selector = Selector::new(items);
        let (flow, _) = exec(&mut selector, "5@gedit");
        assert_eq!(flow, Flow::Stop);
        assert_eq!(*seen.borrow(), vec![(5, "@gedit".to_string())]);
    }

    #[test]
    fn test_ordinal_is_relative_to_page() {
        let picked = Rc::new(Cell::new(0));
        let items: Vec<Item<String>> = (1..=12)
            .map(|i| {
                let picked = Rc::clone(&picked);
                Item::new(format!("n{i}"), move |_, _| {
                    picked.set(i);
                    Ok(false)
                })
            })
            .collect();
        let mut selector = Selector::new(items).page_size(5);
        exec(&mut selector, "next");
        let (flow, _) = exec(&mut selector, "2");
        assert_eq!(flow, Flow::Continue);
        assert_eq!(picked.get(), 7);
    }

    #[test]
    fn test_custom_mapper_builds_bundle() {
        let quiet = Rc::new(Cell::new(None));
        let flag = Rc::clone(&quiet);
        let items = vec![Item::new("square", move |q: bool, _| {
            flag.set(Some(q));
            Ok(true)
        })];
        let mut selector = Selector::with_mapper(items, |after| after.contains('q'));
        exec(&mut selector, "1 q");
        assert_eq!(quiet.get(), Some(true));
    }

    #[test]
    fn test_out_of_range_ordinal_reports_and_continues() {
        let mut selector = Selector::new(numbered(3));
        let (flow, out) = exec(&mut selector, "7");
        assert_eq!(flow, Flow::Continue);
        assert!(out.contains("[cancel]: index \"7\" out of range"));
        let (flow, out) = exec(&mut selector, "0@vim");
        assert_eq!(flow, Flow::Continue);
        assert!(out.contains("index \"0\" out of range"));
    }

    #[test]
    fn test_unknown_command_reports_and_redraws() {
        let mut selector = Selector::new(numbered(2));
        let (flow, out) = exec(&mut selector, "frobnicate");
        assert_eq!(flow, Flow::Continue);
        assert!(out.contains("[cancel]: command \"frobnicate\" not found."));
        assert!(out.contains("[page 1/1]"));
    }

    #[test]
    fn test_help_does_not_redraw_but_next_does() {
        let mut selector = Selector::new(numbered(15)).usage("USAGE TEXT");
        let (_, out) = exec(&mut selector, "help");
        assert!(out.contains("USAGE TEXT"));
        assert!(!out.contains("[page"));
        let (_, out) = exec(&mut selector, "?");
        assert!(!out.contains("[page"));
        let (_, out) = exec(&mut selector, "next");
        assert!(out.contains("[page 2/2]"));
    }

    #[test]
    fn test_help_topic() {
        let mut selector = Selector::new(numbered(1));
        let (_, out) = exec(&mut selector, "help goto");
        assert!(out.starts_with("Go to a special page"));
        let (_, out) = exec(&mut selector, "?nothing");
        assert_eq!(out, "*** No help on nothing\n");
    }

    #[test]
    fn test_bang_line_is_not_found_without_redraw() {
        let mut selector = Selector::new(numbered(1));
        let (flow, out) = exec(&mut selector, "!ls");
        assert_eq!(flow, Flow::Continue);
        assert_eq!(out, "[cancel]: command \"!ls\" not found.\n");
    }

    #[test]
    fn test_empty_line_redraws() {
        let mut selector = Selector::new(numbered(1));
        let (flow, out) = exec(&mut selector, "   ");
        assert_eq!(flow, Flow::Continue);
        assert_eq!(out, "\n 1) item 1\n[page 1/1]\n");
    }

    #[test]
    fn test_reverse_command_changes_display_only() {
        let mut selector = Selector::new(numbered(2));
        let (_, out) = exec(&mut selector, "reverse");
        assert_eq!(out, "\n[page 1/1]\n 2) item 2\n 1) item 1\n");
        assert_eq!(selector.items()[0].text(), "item 1");
    }

    #[test]
    fn test_registered_command_replaces_builtin() {
        let mut selector = Selector::new(numbered(30));
        selector.register(CommandSpec::new("last", "Go to page 2", |pager, _, _| {
            pager.set_page(2);
            Ok(Flow::Continue)
        }));
        exec(&mut selector, "last");
        assert_eq!(selector.pager().page(), 2);
    }

    #[test]
    fn test_quiet_registered_command() {
        let mut selector = Selector::new(numbered(3)).with_command(
            CommandSpec::new("where", "Print a place", |_, _, out| {
                writeln!(out, "here")?;
                Ok(Flow::Continue)
            })
            .quiet(),
        );
        let (_, out) = exec(&mut selector, "where");
        assert_eq!(out, "here\n");
    }

    #[test]
    fn test_run_loop_until_exit() {
        let mut selector = Selector::new(numbered(12))
            .prompt("pick> ")
            .intro("INTRO\n");
        let out = drive(&mut selector, "next\nexit\nnext\n");
        assert!(out.starts_with("INTRO\n 1) item 1"));
        assert!(out.contains("[page 2/2]"));
        assert_eq!(out.matches("pick> ").count(), 2);
        assert_eq!(selector.pager().page(), 2);
    }

    #[test]
    fn test_run_loop_stops_on_eof() {
        let mut selector = Selector::new(numbered(2));
        let out = drive(&mut selector, "show\n");
        assert_eq!(out.matches("> ").count(), 2);
    }

    #[test]
    fn test_run_loop_stops_when_action_says_so() {
        let mut selector = Selector::new(vec![Item::new("only", |_, _| Ok(true))]);
        let out = drive(&mut selector, "1\nnext\n");
        assert_eq!(out.matches("> ").count(), 1);
    }

    #[test]
    fn test_nested_selector_reads_outer_input() {
        let items = vec![Item::new("inner", |_, session| {
            Selector::new(numbered(1)).prompt("inner> ").run_in(session)?;
            Ok(false)
        })];
        let mut selector = Selector::new(items);
        let out = drive(&mut selector, "1\nshow\nexit\nexit\n");
        assert_eq!(out.matches("inner> ").count(), 2);
        assert_eq!(out.matches("> ").count(), 4);
        assert!(out.contains(" 1) item 1\n[page 1/1]"));
    }

    #[test]
    fn test_action_error_propagates() {
        let mut selector: Selector<String> = Selector::new(vec![Item::new(
            "boom",
            |_, _| Err("editor crashed".into()),
        )]);
        let mut out = Vec::new();
        let err = selector
            .run_with(Cursor::new("1\n".to_string()), &mut out)
            .unwrap_err();
        assert_eq!(err.to_string(), "editor crashed");
    }
}
