//! Help output for the registered option groups.

use std::fmt;

use crate::console::{Console, LoggingLevel};
use crate::group::{OptionTable, Registry};
use crate::option::{HandlerId, Opt, ValueKind};

pub const MAX_OPT_NAME_LENGTH: usize = 25;
pub const MAX_OPT_ARGS_LENGTH: usize = 5;
pub const MAX_OPT_DESC_LENGTH: usize = 70;

const INTRO: &str = "The following are the options for this program. If the option \
    represents a function that directly executes an internal handler, it will be \
    preceded by a [fnc] tag. If the option expects an argument, it will be preceded \
    by an [arg] tag. For further help on a function, --help can be appended after a \
    function for specific help on that function.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Arg,
    Function,
    None,
}

impl Tag {
    pub fn as_str(self) -> &'static str {
        match self {
            Tag::Arg => "[arg]",
            Tag::Function => "[fnc]",
            Tag::None => ".....",
        }
    }
}

/// One row of help output, before styling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionLine {
    pub name: String,
    pub tag: Tag,
    pub description: String,
}

impl From<&Opt> for OptionLine {
    fn from(opt: &Opt) -> Self {
        let tag = if opt.takes_arg() {
            Tag::Arg
        } else if opt.value_kind() == ValueKind::Function {
            Tag::Function
        } else {
            Tag::None
        };
        OptionLine {
            name: format!("--{}", opt.name())
                .chars()
                .take(MAX_OPT_NAME_LENGTH)
                .collect(),
            tag,
            description: opt.help_text().to_string(),
        }
    }
}

impl fmt::Display for OptionLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let line = format!(
            "    {:<name$} {:<tag$} {:<desc$}",
            self.name,
            self.tag.as_str(),
            self.description,
            name = MAX_OPT_NAME_LENGTH,
            tag = MAX_OPT_ARGS_LENGTH,
            desc = MAX_OPT_DESC_LENGTH,
        );
        f.write_str(line.trim_end())
    }
}

fn print_table(console: &mut dyn Console, table: &OptionTable) {
    for opt in table.iter() {
        console.option(LoggingLevel::Zero, &OptionLine::from(opt));
    }
}

/// Print help for every registered group, or for one handler.
///
/// With a `target`, the handler's own option and linked group come first,
/// followed by every group that is not made up solely of handler options.
pub fn render(registry: &Registry, target: Option<HandlerId>, console: &mut dyn Console) {
    let level = LoggingLevel::Zero;
    console.header(level, "Help");

    match target {
        Some(handler) => {
            let parent = registry
                .find_handler(handler)
                .and_then(|(gid, index)| registry.group(gid).table().get(index));
            let linked = parent
                .and_then(Opt::linked_group)
                .map(|id| registry.group(id));

            if linked.is_some() {
                console.print(level, "The following are options for the following function:");
            } else {
                console.print(level, "The following function does not have specific arguments:");
            }
            console.new_line(level);
            if let Some(opt) = parent {
                console.option(level, &OptionLine::from(opt));
            }

            if let Some(group) = linked {
                if let Some(help) = group.help() {
                    console.sub_header(level, "Extended Help");
                    console.block(level, help);
                }
                console.sub_header(level, group.name());
                print_table(console, group.table());
            }
        }
        None => console.block(level, INTRO),
    }

    for id in registry.groups() {
        let group = registry.group(id);
        if target.is_some() && group.table().only_handlers() {
            continue;
        }
        console.sub_header(level, group.name());
        print_table(console, group.table());
    }
    console.new_line(level);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::Capture;
    use crate::group::OptionGroup;
    use crate::value::Slot;
    use pretty_assertions::assert_eq;

    const HELLO: HandlerId = HandlerId::new("hello");

    fn registry() -> Registry {
        let mut reg = Registry::default();
        reg.register(
            OptionGroup::new(
                "Commands",
                OptionTable::new()
                    .option(Opt::handler("hello", HELLO).description("Say hello"))
                    .option(Opt::handler("sum", HandlerId::new("sum")).description("Add numbers")),
            ),
            None,
        )
        .unwrap();
        reg.register(
            OptionGroup::new(
                "Program Options",
                OptionTable::new()
                    .option(Opt::flag("verbose", &Slot::new(false)).description("Chatty output"))
                    .option(
                        Opt::string("name", &Slot::new(String::new()), 32)
                            .description("Your name"),
                    ),
            ),
            None,
        )
        .unwrap();
        reg.register(
            OptionGroup::new(
                "hello",
                OptionTable::new()
                    .option(Opt::uint("times", &Slot::new(1u32)).description("Repeat count")),
            )
            .extended_help("Greets the user."),
            Some(HELLO),
        )
        .unwrap();
        reg
    }

    fn rule(title: &str, fill: char) -> String {
        let head = format!("{}[ {} ]", fill, title);
        let pad = crate::console::CONSOLE_WIDTH - head.chars().count();
        format!("{}{}", head, fill.to_string().repeat(pad))
    }

    #[test]
    fn option_line_layout() {
        let flag = Opt::flag("verbose", &Slot::new(false)).description("Chatty output");
        assert_eq!(
            OptionLine::from(&flag).to_string(),
            format!("    {:<25} ..... Chatty output", "--verbose")
        );

        let long = Opt::handler("a-very-long-option-name-indeed", HELLO);
        let line = OptionLine::from(&long);
        assert_eq!(line.name, "--a-very-long-option-name");
        assert_eq!(line.tag, Tag::Function);
        assert_eq!(line.to_string(), "    --a-very-long-option-name [fnc]");
    }

    #[test]
    fn full_help_lists_every_group() {
        let capture = Capture::default();
        render(&registry(), None, &mut capture.clone());
        let mut expected = vec![rule("Help", '=')];
        expected.extend(crate::console::wrap_text(INTRO, crate::console::TEXT_BLOCK_SIZE));
        expected.extend([
            rule("Commands", '-'),
            format!("    {:<25} [fnc] Say hello", "--hello"),
            format!("    {:<25} [fnc] Add numbers", "--sum"),
            rule("Program Options", '-'),
            format!("    {:<25} ..... Chatty output", "--verbose"),
            format!("    {:<25} [arg] Your name", "--name"),
            String::new(),
        ]);
        assert_eq!(capture.text(), expected.join("\n"));
    }

    #[test]
    fn targeted_help_shows_linked_group_and_skips_handler_groups() {
        let capture = Capture::default();
        render(&registry(), Some(HELLO), &mut capture.clone());
        let expected = vec![
            rule("Help", '='),
            "The following are options for the following function:".to_string(),
            String::new(),
            format!("    {:<25} [fnc] Say hello", "--hello"),
            rule("Extended Help", '-'),
            "Greets the user.".to_string(),
            rule("hello", '-'),
            format!("    {:<25} [arg] Repeat count", "--times"),
            rule("Program Options", '-'),
            format!("    {:<25} ..... Chatty output", "--verbose"),
            format!("    {:<25} [arg] Your name", "--name"),
            String::new(),
        ];
        assert_eq!(capture.text(), expected.join("\n"));
    }

    #[test]
    fn targeted_help_without_linked_group() {
        let capture = Capture::default();
        render(&registry(), Some(HandlerId::new("sum")), &mut capture.clone());
        let text = capture.text();
        assert!(text.contains("The following function does not have specific arguments:"));
        assert!(text.contains("--sum"));
        assert!(!text.contains("--hello"));
    }
}
