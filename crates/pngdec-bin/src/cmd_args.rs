/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use clap::{value_parser, Arg, ArgAction, Command};

#[rustfmt::skip]
pub fn create_cmd_args() -> Command {
    Command::new("pngdec")
        .about("Decode png files and print their properties as json")
        .arg(Arg::new("in")
            .short('i')
            .long("input")
            .help("Input file to read data from")
            .action(ArgAction::Append)
            .required(true))
        .arg(Arg::new("out")
            .short('o')
            .long("output")
            .help("Write raw samples to this file, one per input")
            .long_help("Write the raw sample buffer of each input to a file.\nOutputs are paired with inputs in the order given, 16 bit samples are written big endian.")
            .action(ArgAction::Append))
        .arg(Arg::new("suppress-alpha")
            .long("suppress-alpha")
            .action(ArgAction::SetTrue)
            .help_heading("DECODING")
            .help("Drop alpha channels and ignore tRNS chunks"))
        .arg(Arg::new("expand-palette")
            .long("expand-palette")
            .action(ArgAction::SetTrue)
            .help_heading("DECODING")
            .help("Output RGB or RGBA samples instead of palette indices"))
        .arg(Arg::new("gray8")
            .long("gray8")
            .action(ArgAction::SetTrue)
            .help_heading("DECODING")
            .help("Promote 1, 2 and 4 bit gray images to 8 bits"))
        .arg(Arg::new("expand-gray-alpha")
            .long("expand-gray-alpha")
            .action(ArgAction::SetTrue)
            .help_heading("DECODING")
            .help("Output gray + alpha as gray, gray, gray, alpha"))
        .arg(Arg::new("gamma")
            .long("gamma")
            .action(ArgAction::SetTrue)
            .help_heading("GAMMA")
            .help("Gamma correct samples for the display"))
        .arg(Arg::new("user-exponent")
            .long("user-exponent")
            .help_heading("GAMMA")
            .help("User exponent used when gamma correcting")
            .value_parser(value_parser!(f32))
            .default_value("1.0"))
        .arg(Arg::new("display-exponent")
            .long("display-exponent")
            .help_heading("GAMMA")
            .help("Display exponent used when gamma correcting")
            .value_parser(value_parser!(f32))
            .default_value("2.2"))
        .arg(Arg::new("encode-params")
            .long("encode-params")
            .action(ArgAction::SetTrue)
            .help_heading("DECODING")
            .help("Include the parameters needed to re-encode the file"))
        .arg(Arg::new("max-width")
            .long("max-width")
            .help_heading("ADVANCED")
            .help("Refuse images wider than this")
            .value_parser(value_parser!(usize))
            .default_value("16384"))
        .arg(Arg::new("max-height")
            .long("max-height")
            .help_heading("ADVANCED")
            .help("Refuse images taller than this")
            .value_parser(value_parser!(usize))
            .default_value("16384"))
        .arg(Arg::new("debug")
            .long("debug")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display debug information and higher"))
        .arg(Arg::new("trace")
            .long("trace")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display very verbose information"))
        .arg(Arg::new("warn")
            .long("warn")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display warnings and errors"))
        .arg(Arg::new("info")
            .long("info")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display information about the decoding options"))
}
