/*!
 * Tests for override-tag block decomposition
 */

use srv3conv::tag_parser::{parse_blocks, Block, OverrideTag};

#[test]
fn test_parseBlocks_withEmptyText_shouldYieldSingleEmptyPlain() {
    assert_eq!(parse_blocks(""), vec![Block::Plain(String::new())]);
}

#[test]
fn test_parseBlocks_withPlainOnly_shouldKeepMarkers() {
    assert_eq!(parse_blocks("one\\Ntwo"), vec![Block::Plain("one\\Ntwo".to_string())]);
}

#[test]
fn test_parseBlocks_withOverrideBlock_shouldParseTagsInOrder() {
    let blocks = parse_blocks("{\\b1\\c&H0000FF&\\move(0,0,100,100)}text");

    let Block::Override(block) = &blocks[0] else {
        panic!("expected override block, got {:?}", blocks[0]);
    };
    assert_eq!(block.raw, "\\b1\\c&H0000FF&\\move(0,0,100,100)");
    assert_eq!(block.tags, vec![
        OverrideTag { name: "\\b".to_string(), params: vec!["1".to_string()] },
        OverrideTag { name: "\\c".to_string(), params: vec!["&H0000FF&".to_string()] },
        OverrideTag {
            name: "\\move".to_string(),
            params: vec!["0", "0", "100", "100"].into_iter().map(String::from).collect(),
        },
    ]);
    assert_eq!(blocks[1], Block::Plain("text".to_string()));
}

#[test]
fn test_parseBlocks_withBraceWithoutBackslash_shouldBeComment() {
    let blocks = parse_blocks("{TL note: pun}Hi");
    assert_eq!(blocks[0], Block::Comment("TL note: pun".to_string()));
}

#[test]
fn test_parseBlocks_withDrawingLevelAcrossBlocks_shouldTrackLastP() {
    let blocks = parse_blocks("{\\p2}m 0 0{\\b1}l 1 1{\\p0}done");
    assert_eq!(blocks[1], Block::Drawing("m 0 0".to_string()));
    assert_eq!(blocks[3], Block::Drawing("l 1 1".to_string()));
    assert_eq!(blocks[5], Block::Plain("done".to_string()));
}

#[test]
fn test_overrideTag_withFontName_shouldKeepWholeName() {
    let tag = OverrideTag::parse("\\fnDejaVu Sans");
    assert_eq!(tag.name, "\\fn");
    assert_eq!(tag.params, vec!["DejaVu Sans"]);
}

#[test]
fn test_overrideTag_withBlurAndBe_shouldNotConfuseWithBold() {
    assert_eq!(OverrideTag::parse("\\blur2").name, "\\blur");
    assert_eq!(OverrideTag::parse("\\be1").name, "\\be");
    assert_eq!(OverrideTag::parse("\\bord3").name, "\\bord");
    assert_eq!(OverrideTag::parse("\\b700").name, "\\b");
}

#[test]
fn test_parseBlocks_withMultibyteText_shouldSplitOnCharBoundaries() {
    let blocks = parse_blocks("é{\\b1}ü");
    assert_eq!(blocks[0], Block::Plain("é".to_string()));
    assert_eq!(blocks[2], Block::Plain("ü".to_string()));
}
