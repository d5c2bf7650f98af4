use gumdrop::Options;

#[derive(Debug, Options)]
pub struct AppOptions {
    #[options(help = "print this help text")]
    pub help: bool,
    #[options(free, help = "path to the ROM to run")]
    pub rom_path: String,
    #[options(help = "path to a 256-byte DMG boot ROM dump; omit to skip straight to post-boot state")]
    pub boot_rom_path: Option<String>,
    #[options(help = "path to a battery-RAM save file; created next to the ROM if omitted and the cartridge has a battery")]
    pub save_path: Option<String>,
    #[options(
        help = "run without opening a window: step the ROM for --headless-frames frames and exit",
        no_short
    )]
    pub headless: bool,
    #[options(help = "frames to run in --headless mode", default = "3600", no_short)]
    pub headless_frames: u32,
}
