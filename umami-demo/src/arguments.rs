use umami::{Context, Flow, HandlerId, Opt, OptionGroup, OptionTable, Slot, MAX_PARSED_STRING_LEN};

pub const HELLO: HandlerId = HandlerId::new("hello");
pub const SUM: HandlerId = HandlerId::new("sum");

const HELLO_HELP: &str = "Prints a greeting for the name given with --name. The greeting \
    is repeated --times times; --level 2 shouts it.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Quiet,
    Normal,
    Loud,
}

impl Level {
    /// Enum options store the given number plus one, zero when unset.
    fn from_stored(n: i32) -> Level {
        match n {
            1 => Level::Quiet,
            3 => Level::Loud,
            _ => Level::Normal,
        }
    }
}

/// Destinations for every option the demo understands.
#[derive(Debug)]
pub struct Cmdline {
    pub verbose: Slot<bool>,
    pub name: Slot<String>,
    pub name_given: Slot<bool>,
    pub level: Slot<i32>,
    pub ratio: Slot<f32>,
    pub seed: Slot<u64>,
    pub mask: Slot<u8>,
    pub greeting: Slot<String>,
    pub times: Slot<u32>,
    pub left: Slot<i32>,
    pub right: Slot<i32>,
}

impl Default for Cmdline {
    fn default() -> Self {
        Cmdline {
            verbose: Slot::new(false),
            name: Slot::new("world".to_string()),
            name_given: Slot::new(false),
            level: Slot::new(0),
            ratio: Slot::new(1.0),
            seed: Slot::new(0),
            mask: Slot::new(0xff),
            greeting: Slot::new("Hello".to_string()),
            times: Slot::new(1),
            left: Slot::new(0),
            right: Slot::new(0),
        }
    }
}

impl Cmdline {
    pub fn level(&self) -> Level {
        Level::from_stored(self.level.get())
    }
}

fn command_options() -> OptionGroup {
    OptionGroup::new(
        "Commands",
        OptionTable::new()
            .option(Opt::handler("hello", HELLO).description("Greet someone"))
            .option(Opt::handler("sum", SUM).description("Add two integers")),
    )
}

fn program_options(cmd: &Cmdline) -> OptionGroup {
    OptionGroup::new(
        "Program Options",
        OptionTable::new()
            .option(Opt::flag("verbose", &cmd.verbose).description("Print the parsed options"))
            .option(
                Opt::string("name", &cmd.name, MAX_PARSED_STRING_LEN)
                    .defined(&cmd.name_given)
                    .description("Who to greet"),
            )
            .option(
                Opt::enumeration("level", &cmd.level)
                    .description("Output level: 0 quiet, 1 normal, 2 loud"),
            )
            .option(Opt::float("ratio", &cmd.ratio).description("Scaling ratio"))
            .option(Opt::uint64("seed", &cmd.seed).description("Random seed"))
            .option(Opt::hex8("mask", &cmd.mask).description("Feature mask (hex)")),
    )
}

fn hello_options(cmd: &Cmdline) -> OptionGroup {
    OptionGroup::new(
        "hello",
        OptionTable::new()
            .option(
                Opt::string("greeting", &cmd.greeting, 64).description("Word to greet with"),
            )
            .option(Opt::uint("times", &cmd.times).description("How many times to greet")),
    )
    .extended_help(HELLO_HELP)
}

fn sum_options(cmd: &Cmdline) -> OptionGroup {
    OptionGroup::new(
        "sum",
        OptionTable::new()
            .option(Opt::int("left", &cmd.left).description("Left operand"))
            .option(Opt::int("right", &cmd.right).description("Right operand")),
    )
}

/// Register every group the demo uses.
pub fn register(ctx: &mut Context, cmd: &Cmdline) -> umami::Result<()> {
    // Handler options go first so `--hello --help` selects the handler
    // before the help request is seen.
    ctx.register(command_options())?;
    ctx.register(program_options(cmd))?;
    ctx.register_for(HELLO, hello_options(cmd))?;
    ctx.register_for(SUM, sum_options(cmd))?;
    Ok(())
}

/// Parse the program options, then the options of the selected handler.
pub fn parse_args<S: AsRef<str>>(ctx: &mut Context, argv: &[S]) -> umami::Result<Flow> {
    let handler = match ctx.parse(argv, None, true)? {
        Flow::Done(Some(handler)) => handler,
        other => return Ok(other),
    };
    tracing::debug!(handler = %handler, "parsing handler options");
    Ok(match ctx.parse(argv, Some(handler), true)? {
        Flow::Done(_) => Flow::Done(Some(handler)),
        help => help,
    })
}
