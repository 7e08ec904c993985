/*
 *
 *    Copyright (c) 2020-2022 Project CHIP Authors
 *
 *    Licensed under the Apache License, Version 2.0 (the "License");
 *    you may not use this file except in compliance with the License.
 *    You may obtain a copy of the License at
 *
 *        http://www.apache.org/licenses/LICENSE-2.0
 *
 *    Unless required by applicable law or agreed to in writing, software
 *    distributed under the License is distributed on an "AS IS" BASIS,
 *    WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *    See the License for the specific language governing permissions and
 *    limitations under the License.
 */

//! `tlv` - Decode and pretty-print Matter TLV octets.

use std::io::Write;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use env_logger::fmt::style;
use log::{info, Level, LevelFilter};

use rs_matter_tlv::tlv::TLVDisplay;

use parser::InputBase;

#[derive(Parser)]
#[command(name = "tlv")]
#[command(about = "Decode Matter TLV octets")]
struct Cli {
    /// Log verbosity
    #[arg(short = 'v', long, default_value = "normal")]
    verbosity: Verbosity,
    /// The TLV octets are decimal (a `0x` prefix still means hexadecimal)
    #[arg(short = 'd', long, conflicts_with = "hexstring")]
    dec: bool,
    /// The input is a contiguous hex string (e.g. "1524000118") rather than a list
    #[arg(long)]
    hexstring: bool,
    /// A comma-separated list of TLV octets to decode (e.g., "0x15,0x18" or "15,18")
    tlvs: String,
}

/// Verbosity
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum Verbosity {
    /// Silent - print only errors
    #[clap(alias = "s")]
    Silent,
    /// Normal - also print rejected input
    #[default]
    #[clap(alias = "n")]
    Normal,
    /// Chatty - also trace every decoded element
    #[clap(alias = "c")]
    Chatty,
}

impl Verbosity {
    fn log_level(&self) -> LevelFilter {
        match self {
            Self::Silent => LevelFilter::Error,
            Self::Normal => LevelFilter::Warn,
            Self::Chatty => LevelFilter::Trace,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    env_logger::builder()
        .format(|buf, record| {
            let style = match record.level() {
                Level::Trace => style::AnsiColor::Cyan.on_default(),
                Level::Debug => style::AnsiColor::Blue.on_default(),
                Level::Info => style::AnsiColor::Green.on_default(),
                Level::Warn => style::AnsiColor::Yellow
                    .on_default()
                    .effects(style::Effects::BOLD),
                Level::Error => style::AnsiColor::Red
                    .on_default()
                    .effects(style::Effects::BOLD),
            };

            writeln!(buf, "{style}{}{style:#}", record.args())
        })
        .filter_level(cli.verbosity.log_level())
        .init();

    let data = if cli.hexstring {
        parser::parse_hexstring(&cli.tlvs).context("Invalid hex string")?
    } else {
        let base = if cli.dec { InputBase::Dec } else { InputBase::Hex };

        base.parse_list(&cli.tlvs, ',')
    };

    info!("Decoding {} octets: {:02x?}", data.len(), data);

    print!("{}", TLVDisplay::new(&data));

    parser::validate(&data).context("Malformed TLV")
}
