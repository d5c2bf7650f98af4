use gumdrop::Options;

#[derive(Debug, Options)]
pub struct AppOptions {
    #[options(help = "print this help text")]
    pub help: bool,
    #[options(help = "path to the folder with all Blargg test ROMs", default = "")]
    pub blargg_path: String,
    #[options(help = "path to the folder with all Mooneye test ROMs", default = "")]
    pub mooneye_path: String,
    #[options(help = "path to a 256-byte DMG boot ROM dump", default = "")]
    pub boot_rom: String,
    #[options(help = "M-cycles to run each ROM for before snapshotting", default = "2000000")]
    pub cycles: u32,
}
