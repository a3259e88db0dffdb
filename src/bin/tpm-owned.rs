/*
 * This file is part of tpmpoll.
 *
 * Copyright (C) 2025 tpmpoll contributors
 *
 * tpmpoll is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * tpmpoll is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with tpmpoll. If not, see <https://www.gnu.org/licenses/>.
 */

//! Stress-poll /sys/class/tpm/tpm0/owned.

fn main() {
    std::process::exit(tpmpoll::cli::main_with(&tpmpoll::attribute::OWNED));
}
