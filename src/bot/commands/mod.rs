use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Quit Streak Bot commands:")]
pub enum Command {
    #[command(description = "Display this help message")]
    Help,
    #[command(description = "Register and describe the weakness you are quitting")]
    Start,
    #[command(description = "Keep the default start date while registering")]
    Skip,
    #[command(description = "Abort registration")]
    Cancel,
    #[command(description = "Show how many days you are holding on")]
    Days,
    #[command(description = "Relapsed? Restart your streak from today")]
    Failed,
}
