//! Application configuration constants.

/// External PDF to Word converter (the `pdf2docx` command line tool).
pub const PDF_CONVERTER_EXECUTABLE: &str = "pdf2docx";

/// LibreOffice binary used as the PDF export host outside Windows.
pub const LIBREOFFICE_EXECUTABLE: &str = "soffice";

/// HTML rasteriser looked up on `PATH` at startup.
pub const HTML_RENDERER_EXECUTABLE: &str = "wkhtmltoimage";

/// JPEG quality for the PNG/HEIC to JPG cards.
pub const JPEG_QUALITY: u8 = 95;

/// Quality requested for WEBP output.
pub const WEBP_QUALITY: u8 = 85;

/// Quality used when a JPEG target carries no explicit quality.
pub const DEFAULT_JPEG_QUALITY: u8 = 75;

/// Frame sizes written into `.ico` files.
pub const ICON_SIZES: [(u32, u32); 4] = [(16, 16), (32, 32), (48, 48), (64, 64)];

/// Largest frame the ICO container can describe.
pub const MAX_ICON_DIMENSION: u32 = 256;

/// Extensions routed through the HEIC decoder instead of the image crate.
pub const HEIC_EXTENSIONS: [&str; 2] = ["heic", "heif"];

/// Status line text shown while no batch is running.
pub const IDLE_STATUS: &str = "Please select an operation.";

/// Title of the destination folder picker.
pub const OUTPUT_FOLDER_DIALOG_TITLE: &str = "Select Output Folder for Converted Files";
