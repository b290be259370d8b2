use crate::cli::args::ConfigurationsArgs;
use crate::exit_codes::SUCCESS;

pub fn run(args: ConfigurationsArgs) -> i32 {
    for configuration in args.xlen.builtin_configurations() {
        println!("{configuration}");
    }
    SUCCESS
}
