//! Parsing context: registry, ledger and print sink for one program.

use crate::console::{ColorMode, Console, LoggingLevel, Terminal};
use crate::error::{fatal, Error, Result};
use crate::getopt::{self, Token};
use crate::group::{GroupId, OptionGroup, Registered, Registry, MAX_OPTION_GROUPS};
use crate::help;
use crate::ledger::{Ledger, MAX_CLI_ARGS};
use crate::option::{Decoding, HandlerId};
use crate::value::{FromValue, IntoValue};

const DIAG: LoggingLevel = LoggingLevel::One;

/// Outcome of a successful [`Context::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Parsing finished; carries the handler selected in this pass, if any.
    Done(Option<HandlerId>),
    /// Help was printed. `forced` is set when unrecognized options, not an
    /// explicit `--help`, caused it.
    Help {
        target: Option<HandlerId>,
        forced: bool,
    },
}

impl Flow {
    pub fn handler(self) -> Option<HandlerId> {
        match self {
            Flow::Done(handler) => handler,
            Flow::Help { .. } => None,
        }
    }
}

// ============================================================================
// ContextBuilder
// ============================================================================

pub struct ContextBuilder {
    program: String,
    max_groups: usize,
    max_args: usize,
    decoding: Decoding,
    console: Option<Box<dyn Console>>,
}

impl ContextBuilder {
    pub fn new(program: &str) -> Self {
        ContextBuilder {
            program: program.to_string(),
            max_groups: MAX_OPTION_GROUPS,
            max_args: MAX_CLI_ARGS,
            decoding: Decoding::default(),
            console: None,
        }
    }

    pub fn max_groups(mut self, n: usize) -> Self {
        self.max_groups = n;
        self
    }

    pub fn max_args(mut self, n: usize) -> Self {
        self.max_args = n;
        self
    }

    pub fn decoding(mut self, decoding: Decoding) -> Self {
        self.decoding = decoding;
        self
    }

    pub fn console(mut self, console: impl Console + 'static) -> Self {
        self.console = Some(Box::new(console));
        self
    }

    pub fn build(self) -> Context {
        let console = self.console.unwrap_or_else(|| {
            Box::new(Terminal::stdio(LoggingLevel::Zero, ColorMode::Auto))
        });
        Context {
            program: self.program,
            registry: Registry::new(self.max_groups),
            ledger: Ledger::new(self.max_args),
            console,
            decoding: self.decoding,
            last_parsed: None,
        }
    }
}

// ============================================================================
// Context
// ============================================================================

pub struct Context {
    program: String,
    registry: Registry,
    ledger: Ledger,
    console: Box<dyn Console>,
    decoding: Decoding,
    last_parsed: Option<GroupId>,
}

impl Context {
    pub fn builder(program: &str) -> ContextBuilder {
        ContextBuilder::new(program)
    }

    pub fn new(program: &str) -> Self {
        ContextBuilder::new(program).build()
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn console_mut(&mut self) -> &mut dyn Console {
        self.console.as_mut()
    }

    // -- registration --

    /// Add a top-level group.
    pub fn register(&mut self, group: OptionGroup) -> Result<GroupId> {
        self.register_with(group, None)
    }

    /// Attach `group` to the handler option bound to `handler`.
    pub fn register_for(&mut self, handler: HandlerId, group: OptionGroup) -> Result<GroupId> {
        self.register_with(group, Some(handler))
    }

    fn register_with(&mut self, group: OptionGroup, handler: Option<HandlerId>) -> Result<GroupId> {
        let name = group.name().to_string();
        self.console.debug(
            DIAG,
            &format!("Attempting to register \"{}\" to options registry", name),
        );
        if let Some(handler) = handler {
            self.console.debug(
                DIAG,
                &format!("Looking for option with handler \"{}\"", handler),
            );
        }

        let registered = self.registry.register(group, handler)?;
        let msg = match &registered {
            Registered::Added(_) => format!(
                "Successfully registered options \"{}\" to options registry! Registry now has {} groups registered.",
                name,
                self.registry.len()
            ),
            Registered::Duplicate(_) => format!(
                "Options \"{}\" was already in the registry. Nothing happened.",
                name
            ),
            Registered::Linked { option, .. } => format!(
                "Successfully registered options \"{}\" to function \"{}\"",
                name, option
            ),
        };
        self.console.debug(DIAG, &msg);
        Ok(registered.id())
    }

    /// Like [`Context::register`] / [`Context::register_for`], exiting with
    /// status 1 on failure.
    pub fn register_or_exit(&mut self, group: OptionGroup, handler: Option<HandlerId>) -> GroupId {
        match self.register_with(group, handler) {
            Ok(id) => id,
            Err(err) => fatal(self.console.as_mut(), &err),
        }
    }

    // -- parsing --

    /// Run one pass over `argv` (including the program name at index 0).
    ///
    /// Every top-level group not yet fully parsed is scanned in registration
    /// order, followed by the group linked to `handler` when one is given.
    /// The pass stops at the first handler option matched or at `--help`.
    pub fn parse<S: AsRef<str>>(
        &mut self,
        argv: &[S],
        handler: Option<HandlerId>,
        help: bool,
    ) -> Result<Flow> {
        let argc = argv.len();
        if argc <= 1 {
            self.console.warn(DIAG, "No arguments to parse!");
            return Ok(Flow::Done(None));
        }
        if argc > self.ledger.capacity() {
            return Err(Error::TooManyArguments {
                count: argc,
                capacity: self.ledger.capacity(),
            });
        }
        self.console.debug(
            DIAG,
            "Command line arguments detected, will try to parse them",
        );

        let mut visit: Vec<GroupId> = self.registry.groups().collect();
        if let Some(handler) = handler {
            self.push_linked_group(handler, &mut visit);
        }

        let total = visit.len();
        let mut matched = None;
        let mut explicit_help = false;

        for (i, id) in visit.into_iter().enumerate() {
            let group = self.registry.group_mut(id);
            self.console.debug(
                DIAG,
                &format!("Parsing options group: \"{}\" [{}/{}]", group.name(), i + 1, total),
            );

            if group.table().all_parsed() {
                self.console.debug(DIAG, "Already parsed, moving on...");
                continue;
            }
            if let Some(index) = group.table().first_unbound() {
                let option = group
                    .table()
                    .get(index)
                    .map(|opt| opt.name().to_string())
                    .unwrap_or_default();
                return Err(Error::UnboundDestination {
                    group: group.name().to_string(),
                    option,
                });
            }

            let mut cursor = 1;
            loop {
                let token = getopt::next(argv, &mut cursor, &mut self.ledger, group.table_mut())?;
                let (index, argument) = match token {
                    Token::End => {
                        self.console.debug(DIAG, "Reached end of options!");
                        break;
                    }
                    Token::Help => {
                        self.console.debug(DIAG, "Help wanted! Help's on the way.");
                        explicit_help = true;
                        break;
                    }
                    Token::Matched { index, argument } => (index, argument),
                };

                let table = group.table();
                let Some(opt) = table.get(index) else {
                    break;
                };
                let Some(dest) = opt.destination() else {
                    return Err(Error::UnboundDestination {
                        group: group.name().to_string(),
                        option: opt.name().to_string(),
                    });
                };
                if dest.kind() != opt.value_kind() {
                    return Err(Error::InvalidType {
                        option: opt.name().to_string(),
                        kind: opt.value_kind(),
                        bound: dest.holds(),
                    });
                }

                match &argument {
                    Some(text) => self.console.debug(
                        DIAG,
                        &format!(
                            "Found {} option \"{}\" with argument \"{}\"",
                            opt.value_kind(),
                            opt.name(),
                            text
                        ),
                    ),
                    None => self.console.debug(
                        DIAG,
                        &format!("Found {} option \"{}\"", opt.value_kind(), opt.name()),
                    ),
                }
                dest.assign(opt.name(), argument.as_deref(), self.decoding)?;

                match &opt.defined {
                    Some(flag) => {
                        flag.set(true);
                        self.console.debug(
                            DIAG,
                            &format!("Option \"{}\" set as defined.", opt.name()),
                        );
                    }
                    None => self.console.debug(
                        DIAG,
                        &format!(
                            "Option \"{}\" does not have a defined flag associated.",
                            opt.name()
                        ),
                    ),
                }

                if let Some(h) = dest.handler() {
                    matched = Some(h);
                    break;
                }
            }

            group.table_mut().set_all_parsed(true);
            self.last_parsed = Some(id);
            if matched.is_some() || explicit_help {
                break;
            }
        }

        let mut unrecognized = false;
        if help && matched.is_none() {
            let stray: Vec<usize> = self.ledger.unmarked(argc).collect();
            for pos in stray {
                self.console.error(
                    LoggingLevel::Zero,
                    &format!("\"{}\" is not a recognized option!", argv[pos].as_ref()),
                );
                unrecognized = true;
            }
        }

        if help && matched.is_none() && (explicit_help || unrecognized) {
            help::render(&self.registry, handler, self.console.as_mut());
            return Ok(Flow::Help {
                target: handler,
                forced: !explicit_help,
            });
        }

        Ok(Flow::Done(matched))
    }

    fn push_linked_group(&mut self, handler: HandlerId, visit: &mut Vec<GroupId>) {
        let parent = self
            .registry
            .find_handler(handler)
            .and_then(|(gid, index)| self.registry.group(gid).table().get(index));
        match parent {
            Some(opt) => match opt.linked_group() {
                Some(linked) => {
                    let msg = format!(
                        "Found options \"{}\" for function \"{}\"",
                        self.registry.group(linked).name(),
                        opt.name()
                    );
                    visit.push(linked);
                    self.console.debug(DIAG, &msg);
                }
                None => {
                    let msg = format!(
                        "Found function \"{}\" but it does not have options associated with it.",
                        opt.name()
                    );
                    self.console.warn(DIAG, &msg);
                }
            },
            None => self.console.warn(
                DIAG,
                &format!(
                    "No option selects handler \"{}\"; nothing handler-specific to parse.",
                    handler
                ),
            ),
        }
    }

    /// Like [`Context::parse`], but exits the process on errors (status 1)
    /// and after printing help (status 0, or 1 when help was forced).
    pub fn parse_or_exit<S: AsRef<str>>(
        &mut self,
        argv: &[S],
        handler: Option<HandlerId>,
        help: bool,
    ) -> Option<HandlerId> {
        match self.parse(argv, handler, help) {
            Ok(Flow::Done(handler)) => handler,
            Ok(Flow::Help { forced, .. }) => std::process::exit(i32::from(forced)),
            Err(err) => fatal(self.console.as_mut(), &err),
        }
    }

    pub fn print_help(&mut self, target: Option<HandlerId>) {
        help::render(&self.registry, target, self.console.as_mut());
    }

    // -- session state --

    /// Clear the ledger and every parsed bit so unrelated argument vectors
    /// can be parsed with the same registry.
    pub fn reset_session(&mut self) {
        self.ledger.reset();
        let ids: Vec<GroupId> = self.registry.groups().collect();
        for id in ids {
            self.clear_group(id);
        }
        self.last_parsed = None;
    }

    fn clear_group(&mut self, id: GroupId) {
        let linked: Vec<GroupId> = self
            .registry
            .group(id)
            .table()
            .iter()
            .filter_map(|opt| opt.linked_group())
            .collect();
        self.registry.group_mut(id).table_mut().set_all_parsed(false);
        for child in linked {
            self.registry.group_mut(child).table_mut().set_all_parsed(false);
        }
    }

    /// The group the most recent pass finished scanning.
    pub fn last_parsed(&self) -> Option<GroupId> {
        self.last_parsed
    }

    /// Set every parsed bit of the last scanned group.
    pub fn set_last_parsed(&mut self, state: bool) {
        if let Some(id) = self.last_parsed {
            self.registry.group_mut(id).table_mut().set_all_parsed(state);
        }
    }

    pub fn is_defined(&self, group: GroupId, name: &str) -> bool {
        self.registry.group(group).table().is_defined(name)
    }

    pub fn set_defined(&mut self, group: GroupId, name: &str, state: bool) {
        if !self.registry.group(group).table().set_defined(name, state) {
            self.console.warn(
                DIAG,
                &format!(
                    "Option \"{}\" does not have a defined flag variable associated! Cannot set to defined state.",
                    name
                ),
            );
        }
    }

    pub fn get<T: FromValue>(&self, group: GroupId, name: &str) -> Result<T> {
        self.registry.get(group, name)
    }

    pub fn set<V: IntoValue>(&self, group: GroupId, name: &str, value: V) -> Result<()> {
        self.registry.set(group, name, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::{Capture, Severity};
    use crate::group::OptionTable;
    use crate::option::{ArgKind, Destination, Opt, ValueKind};
    use crate::value::Slot;

    const HELLO: HandlerId = HandlerId::new("hello");
    const SUM: HandlerId = HandlerId::new("sum");

    struct Program {
        ctx: Context,
        capture: Capture,
        verbose: Slot<bool>,
        name: Slot<String>,
        level: Slot<i32>,
        name_given: Slot<bool>,
        times: Slot<u32>,
        program: GroupId,
    }

    fn argv(line: &str) -> Vec<String> {
        std::iter::once("prog")
            .chain(line.split_whitespace())
            .map(String::from)
            .collect()
    }

    fn program() -> Program {
        program_with(Context::builder("prog"), Capture::new(LoggingLevel::One))
    }

    fn program_with(builder: ContextBuilder, capture: Capture) -> Program {
        let verbose = Slot::new(false);
        let name = Slot::new(String::new());
        let level = Slot::new(0);
        let name_given = Slot::new(false);
        let times = Slot::new(1u32);

        let mut ctx = builder.console(capture.clone()).build();
        ctx.register(OptionGroup::new(
            "Commands",
            OptionTable::new()
                .option(Opt::handler("hello", HELLO).description("Say hello"))
                .option(Opt::handler("sum", SUM).description("Add numbers")),
        ))
        .unwrap();
        let program = ctx
            .register(OptionGroup::new(
                "Program Options",
                OptionTable::new()
                    .option(Opt::flag("verbose", &verbose))
                    .option(Opt::string("name", &name, 16).defined(&name_given))
                    .option(Opt::enumeration("level", &level)),
            ))
            .unwrap();
        ctx.register_for(
            HELLO,
            OptionGroup::new("hello", OptionTable::new().option(Opt::uint("times", &times))),
        )
        .unwrap();

        Program {
            ctx,
            capture,
            verbose,
            name,
            level,
            name_given,
            times,
            program,
        }
    }

    #[test]
    fn flags_and_strings_are_assigned() {
        let mut p = program();
        let args = argv("--verbose --name Ada");
        let flow = p.ctx.parse(&args, None, true).unwrap();
        assert_eq!(flow, Flow::Done(None));
        assert_eq!(p.ctx.ledger().unmarked(args.len()).count(), 0);
        assert!(p.verbose.get());
        assert_eq!(p.name.get(), "Ada");
        assert!(p.name_given.get());
        assert!(p.ctx.is_defined(p.program, "name"));
        assert_eq!(p.ctx.last_parsed(), Some(p.program));
    }

    #[test]
    fn missing_argument_aborts() {
        let mut p = program();
        let err = p.ctx.parse(&argv("--name"), None, true).unwrap_err();
        assert!(matches!(err, Error::MissingArgument(n) if n == "name"));
        assert_eq!(p.name.get(), "");
    }

    #[test]
    fn stray_argument_aborts() {
        let mut p = program();
        let err = p.ctx.parse(&argv("stray"), None, true).unwrap_err();
        assert!(matches!(err, Error::StrayArgument(ref t) if t == "stray"));
        assert!(!err.is_setup());
    }

    #[test]
    fn help_prints_and_reports() {
        let mut p = program();
        let flow = p.ctx.parse(&argv("--help"), None, true).unwrap();
        assert_eq!(
            flow,
            Flow::Help {
                target: None,
                forced: false
            }
        );
        assert!(p.capture.text().contains("[ Help ]"));
        assert!(p.capture.text().contains("[ Program Options ]"));
        assert!(!p.verbose.get());
        assert_eq!(p.name.get(), "");
        assert!(!p.name_given.get());
        assert_eq!(p.level.get(), 0);
        assert_eq!(p.times.get(), 1);
    }

    #[test]
    fn help_disabled_is_ignored() {
        let mut p = program();
        let flow = p.ctx.parse(&argv("--help --verbose"), None, false).unwrap();
        assert_eq!(flow, Flow::Done(None));
        assert!(!p.capture.text().contains("[ Help ]"));
    }

    #[test]
    fn enum_values_are_offset() {
        let mut p = program();
        p.ctx.parse(&argv("--level 2"), None, true).unwrap();
        assert_eq!(p.level.get(), 3);
    }

    #[test]
    fn parsing_twice_changes_nothing() {
        let mut p = program();
        let args = argv("--name Ada");
        p.ctx.parse(&args, None, true).unwrap();
        p.name.set("changed".to_string());
        let flow = p.ctx.parse(&args, None, true).unwrap();
        assert_eq!(flow, Flow::Done(None));
        assert_eq!(p.name.get(), "changed");
    }

    #[test]
    fn a_position_is_consumed_once() {
        let first = Slot::new(String::new());
        let second = Slot::new(String::new());
        let mut ctx = Context::builder("prog").console(Capture::default()).build();
        ctx.register(OptionGroup::new(
            "First",
            OptionTable::new().option(Opt::string("name", &first, 16)),
        ))
        .unwrap();
        ctx.register(OptionGroup::new(
            "Second",
            OptionTable::new().option(Opt::string("name", &second, 16)),
        ))
        .unwrap();

        ctx.parse(&argv("--name Ada"), None, true).unwrap();
        assert_eq!(first.get(), "Ada");
        assert_eq!(second.get(), "");
    }

    #[test]
    fn first_occurrence_wins_and_repeat_is_unrecognized() {
        let mut p = program();
        let flow = p
            .ctx
            .parse(&argv("--name Ada --name Grace"), None, false)
            .unwrap();
        assert_eq!(flow, Flow::Done(None));
        assert_eq!(p.name.get(), "Ada");

        let mut p = program();
        let flow = p
            .ctx
            .parse(&argv("--name Ada --name Grace"), None, true)
            .unwrap();
        assert_eq!(
            flow,
            Flow::Help {
                target: None,
                forced: true
            }
        );
        assert_eq!(p.name.get(), "Ada");
        assert_eq!(
            p.capture.of(Severity::Error),
            vec![
                "\"--name\" is not a recognized option!".to_string(),
                "\"Grace\" is not a recognized option!".to_string(),
            ]
        );
    }

    #[test]
    fn handler_dispatch_runs_in_two_passes() {
        let mut p = program();
        let args = argv("--hello --times 3 --verbose");

        let flow = p.ctx.parse(&args, None, true).unwrap();
        assert_eq!(flow, Flow::Done(Some(HELLO)));
        assert_eq!(p.times.get(), 1);

        let flow = p.ctx.parse(&args, flow.handler(), true).unwrap();
        assert_eq!(flow, Flow::Done(None));
        assert_eq!(p.times.get(), 3);
        assert!(p.verbose.get());
        assert_eq!(p.ctx.ledger().unmarked(args.len()).count(), 0);
    }

    #[test]
    fn handler_without_options_only_warns() {
        let mut p = program();
        let args = argv("--sum");
        let flow = p.ctx.parse(&args, None, true).unwrap();
        assert_eq!(flow, Flow::Done(Some(SUM)));
        let flow = p.ctx.parse(&args, Some(SUM), true).unwrap();
        assert_eq!(flow, Flow::Done(None));
        assert!(p
            .capture
            .of(Severity::Warn)
            .iter()
            .any(|w| w.contains("does not have options associated")));
    }

    #[test]
    fn help_after_handler_targets_it() {
        let mut p = program();
        let args = argv("--hello --help");
        let flow = p.ctx.parse(&args, None, true).unwrap();
        assert_eq!(flow, Flow::Done(Some(HELLO)));
        assert!(!p.capture.text().contains("[ Help ]"));

        let flow = p.ctx.parse(&args, Some(HELLO), true).unwrap();
        assert_eq!(
            flow,
            Flow::Help {
                target: Some(HELLO),
                forced: false
            }
        );
        let text = p.capture.text();
        assert!(text.contains("The following are options for the following function:"));
        assert!(text.contains("--times"));
        assert!(!text.contains("[ Commands ]"));
    }

    #[test]
    fn unrecognized_option_forces_help() {
        let mut p = program();
        let flow = p.ctx.parse(&argv("--bogus"), None, true).unwrap();
        assert_eq!(
            flow,
            Flow::Help {
                target: None,
                forced: true
            }
        );
        assert_eq!(
            p.capture.of(Severity::Error),
            vec!["\"--bogus\" is not a recognized option!".to_string()]
        );
    }

    #[test]
    fn no_arguments_warns() {
        let mut p = program();
        let flow = p.ctx.parse(&argv(""), None, true).unwrap();
        assert_eq!(flow, Flow::Done(None));
        assert_eq!(
            p.capture.of(Severity::Warn),
            vec!["No arguments to parse!".to_string()]
        );
    }

    #[test]
    fn too_many_arguments() {
        let mut p = program_with(Context::builder("prog").max_args(3), Capture::default());
        let err = p.ctx.parse(&argv("--verbose a b c"), None, true).unwrap_err();
        assert!(matches!(
            err,
            Error::TooManyArguments {
                count: 5,
                capacity: 3
            }
        ));
    }

    #[test]
    fn unbound_destination_is_fatal() {
        let mut ctx = Context::builder("prog").console(Capture::default()).build();
        ctx.register(OptionGroup::new(
            "Loose",
            OptionTable::new().option(Opt::new("loose")),
        ))
        .unwrap();
        let err = ctx.parse(&argv("--loose"), None, true).unwrap_err();
        assert!(matches!(err, Error::UnboundDestination { option, .. } if option == "loose"));
    }

    #[test]
    fn kind_and_destination_must_agree() {
        let flag = Slot::new(false);
        let mut ctx = Context::builder("prog").console(Capture::default()).build();
        ctx.register(OptionGroup::new(
            "Mixed",
            OptionTable::new().option(
                Opt::new("count")
                    .arg(ArgKind::Required)
                    .kind(ValueKind::Uint)
                    .bind(Destination::Flag(flag.clone())),
            ),
        ))
        .unwrap();
        let err = ctx.parse(&argv("--count 3"), None, true).unwrap_err();
        assert!(matches!(err, Error::InvalidType { kind: ValueKind::Uint, .. }));
        assert!(!flag.get());
    }

    #[test]
    fn strict_and_lenient_decoding() {
        let mut p = program();
        let err = p.ctx.parse(&argv("--level two"), None, true).unwrap_err();
        assert!(matches!(err, Error::BadValue { kind: ValueKind::Enum, .. }));

        let mut p = program_with(
            Context::builder("prog").decoding(Decoding::Lenient),
            Capture::default(),
        );
        p.ctx.parse(&argv("--level two"), None, true).unwrap();
        assert_eq!(p.level.get(), 1);
    }

    #[test]
    fn registry_capacity_comes_from_builder() {
        let mut ctx = Context::builder("prog")
            .max_groups(1)
            .console(Capture::default())
            .build();
        ctx.register(OptionGroup::new("One", OptionTable::new())).unwrap();
        let err = ctx
            .register(OptionGroup::new("Two", OptionTable::new()))
            .unwrap_err();
        assert!(err.is_setup());
    }

    #[test]
    fn reused_group_name_does_not_hide_options() {
        let alpha = Slot::new(false);
        let beta = Slot::new(false);
        let mut ctx = Context::builder("prog").console(Capture::default()).build();
        ctx.register(OptionGroup::new(
            "Options",
            OptionTable::new().option(Opt::flag("alpha", &alpha)),
        ))
        .unwrap();
        let err = ctx
            .register(OptionGroup::new(
                "Options",
                OptionTable::new().option(Opt::flag("beta", &beta)),
            ))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateGroup(ref name) if name == "Options"));
        assert!(err.is_setup());

        // Registering the very same bindings again is still harmless.
        let again = ctx.register(OptionGroup::new(
            "Options",
            OptionTable::new().option(Opt::flag("alpha", &alpha)),
        ));
        assert!(again.is_ok());
        assert_eq!(ctx.registry().len(), 1);
    }

    #[test]
    fn print_help_on_demand() {
        let mut p = program();
        assert_eq!(p.ctx.program(), "prog");

        let commands = p.ctx.registry().find("Commands").unwrap();
        p.ctx
            .registry_mut()
            .group_mut(commands)
            .table_mut()
            .set_parsed("hello", true);
        assert!(p.ctx.registry().group(commands).table().is_parsed("hello"));

        p.ctx.print_help(Some(HELLO));
        let text = p.capture.text();
        assert!(text.contains("[ Help ]"));
        assert!(text.contains("--times"));
        assert!(!text.contains("[ Commands ]"));
    }

    #[test]
    fn reset_session_allows_a_fresh_pass() {
        let mut p = program();
        p.ctx.parse(&argv("--name Ada"), None, true).unwrap();
        p.ctx.reset_session();
        assert_eq!(p.ctx.last_parsed(), None);
        p.ctx.parse(&argv("--name Grace"), None, true).unwrap();
        assert_eq!(p.name.get(), "Grace");
    }

    #[test]
    fn last_parsed_group_can_be_reopened() {
        let mut p = program();
        p.ctx.parse(&argv("--verbose"), None, true).unwrap();
        assert!(p.ctx.registry().group(p.program).table().all_parsed());
        p.ctx.set_last_parsed(false);
        assert!(!p.ctx.registry().group(p.program).table().all_parsed());
    }

    #[test]
    fn named_access_through_context() {
        let mut p = program();
        p.ctx.set(p.program, "name", "Grace").unwrap();
        assert_eq!(p.ctx.get::<String>(p.program, "name").unwrap(), "Grace");

        p.ctx.set_defined(p.program, "verbose", true);
        assert!(p
            .capture
            .of(Severity::Warn)
            .iter()
            .any(|w| w.contains("\"verbose\" does not have a defined flag")));
        p.ctx.set_defined(p.program, "name", false);
        assert!(!p.name_given.get());
    }
}
