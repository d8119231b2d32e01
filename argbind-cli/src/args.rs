use argbind_core::prelude::*;

/// Command line arguments for the demo binary
#[derive(Debug, Default)]
pub struct DemoArgs {
    /// Account user name
    pub user_name: Option<String>,

    /// Account password
    pub password: Option<String>,

    /// Account creation time in unix time
    pub creation_time: Option<i64>,

    /// Account creation date as free text
    pub creation_date: Option<String>,

    /// Tags attached to the account
    pub tags: Vec<String>,

    /// Lower and upper bound of the account id range
    pub id_range: Option<(u32, u32)>,

    /// Enable verbose debug output
    pub debug: bool,
}

impl Args for DemoArgs {
    fn program_info(&self) -> &str {
        "argbind demo: binds account creation arguments and prints the result."
    }

    fn properties() -> Option<ArgsProperties> {
        Some(ArgsProperties::default())
    }

    fn arguments() -> ArgumentTable<Self> {
        ArgumentTable::<Self>::new()
            .value::<String, _>(
                Argument::new("u", "The users name.").required().requires(["pw"]),
                |args, value| args.user_name = Some(value),
            )
            .value::<String, _>(
                Argument::new("pw", "The user password.").requires(["u"]),
                |args, value| args.password = Some(value),
            )
            .value::<i64, _>(
                Argument::new("t", "The account creation date in unix time."),
                |args, value| args.creation_time = Some(value),
            )
            .value::<String, _>(
                Argument::new("d", "The account creation date.").excludes(["t"]),
                |args, value| args.creation_date = Some(value),
            )
            .value::<Vec<String>, _>(
                Argument::new("tags", "Tags separated by ';'."),
                |args, value| args.tags = value,
            )
            .handler(
                Argument::new("range", "Lower and upper bound of the id range."),
                [TypeTag::of::<u32>(), TypeTag::of::<u32>()],
                |args, values| {
                    let lower = values.take::<u32>()?;
                    let upper = values.take::<u32>()?;
                    args.id_range = Some((lower.min(upper), lower.max(upper)));
                    Ok(())
                },
            )
            .flag(
                Argument::new("debug", "Enable verbose debug output."),
                |args| &mut args.debug,
            )
    }
}
