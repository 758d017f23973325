use sokoban_core::{Cell, CellCoord, LevelError, Spawn, Terrain};
use sokoban_world::{parse, parse_with_report, query, Level, World};

#[test]
fn fault_tolerant_parse_skips_only_the_broken_level() {
    let levels = parse(";A\n#@#\n;B\n#X#\n;C\n#$#\n");

    let names: Vec<&str> = levels.iter().map(Level::name).collect();
    assert_eq!(names, ["A", "C"]);
}

#[test]
fn level_without_player_parses_but_never_becomes_current() {
    let world = World::from_text(";A\n#@#\n;B\n#X#\n;C\n#$#\n");

    assert_eq!(query::level_count(&world), 2);
    assert_eq!(query::current_index(&world), 0);
}

#[test]
fn round_trip_reproduces_every_in_bounds_symbol() {
    let rows = [
        "  #####",
        "###   #",
        "#.@$  #",
        "### $.#",
        "#.##$ #",
        "# # . ##",
        "#$ *$$.#",
        "#   .  #",
        "########",
    ];
    let text = format!("{}\n; 1\n", rows.join("\n"));

    let levels = parse(&text);
    assert_eq!(levels.len(), 1);
    let level = &levels[0];
    assert_eq!(level.columns(), 8);
    assert_eq!(level.rows(), 9);

    for (row_index, row) in (0u32..).zip(rows) {
        let offset = row.find(|symbol: char| symbol != ' ').unwrap_or(row.len());
        for (column_index, symbol) in (0u32..).zip(row.chars()) {
            let cell = level.cell(CellCoord::new(column_index, row_index));
            if (column_index as usize) < offset {
                assert_eq!(cell, Cell::SPACE);
            } else {
                assert_eq!(cell.symbol(), Some(symbol), "row {row_index} column {column_index}");
            }
        }
    }
}

#[test]
fn packed_encoding_matches_nibble_layout() {
    let level = Level::from_rows("packed", &["#+*$."]).expect("valid row");
    let packed: Vec<u8> = level.iter_cells().map(|(_, cell)| cell.packed()).collect();

    assert_eq!(packed, [0x03, 0x22, 0x12, 0x11, 0x02]);
}

#[test]
fn trailing_and_leading_files_produce_the_same_level() {
    let trailing = parse("####\n#@.#\n#$ #\n####\n;Same\n");
    let leading = parse("\n;Same\n####\n#@.#\n#$ #\n####\n\n");

    assert_eq!(trailing, leading);
}

#[test]
fn report_names_each_skipped_level_in_order() {
    let text = concat!(
        "#@#\n;good\n",
        "#@ &#\n;ampersand\n",
        ";empty\n",
        "#\t@#\n;tab\n",
    );

    let report = parse_with_report(text);

    assert_eq!(report.levels().len(), 1);
    let skipped: Vec<(&str, &LevelError)> = report
        .skipped()
        .iter()
        .map(|skipped| (skipped.name.as_str(), &skipped.reason))
        .collect();
    assert_eq!(
        skipped,
        [
            (
                "ampersand",
                &LevelError::InvalidSymbol {
                    symbol: '&',
                    line: 3,
                    column: 4,
                }
            ),
            ("empty", &LevelError::EmptyLevel),
            (
                "tab",
                &LevelError::InvalidSymbol {
                    symbol: '\t',
                    line: 6,
                    column: 2,
                }
            ),
        ]
    );
}

#[test]
fn spawn_markers_sit_in_the_high_field() {
    let level = Level::from_rows("spawns", &["@$*+"]).expect("valid row");
    let cells: Vec<Cell> = level.iter_cells().map(|(_, cell)| cell).collect();

    assert_eq!(cells[0], Cell::new(Terrain::Floor, Spawn::Player));
    assert_eq!(cells[1], Cell::new(Terrain::Floor, Spawn::Crate));
    assert_eq!(cells[2], Cell::new(Terrain::Target, Spawn::Crate));
    assert_eq!(cells[3], Cell::new(Terrain::Target, Spawn::Player));
}
