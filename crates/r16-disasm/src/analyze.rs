use std::collections::{BTreeSet, VecDeque};
use serde::Serialize;

use r16_asm::decoder::Decoder;
use r16_asm::disasm::branch_target;
use r16_asm::isa::r16::R16Decoder;
use r16_asm::RomImage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind { Fallthrough, Branch, CondBranch, Call }

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Edge { pub from: u32, pub to: u32, pub kind: EdgeKind }

#[derive(Debug, Clone, Default, Serialize)]
pub struct Analysis {
    pub entries: Vec<u32>,
    pub visited: BTreeSet<u32>,
    pub edges: Vec<Edge>,
    /// Register-indirect jumps whose target is unknown statically.
    pub indirect: BTreeSet<u32>,
    pub returns: BTreeSet<u32>,
}

/// Follows pc-relative branches from `entries`. `BR*` jumps go through a
/// register and end the walk unless conditional.
pub fn analyze_entries(img: &RomImage, entries: &[u32], max_instr: usize) -> Analysis {
    let dec = R16Decoder::new();
    let mut a = Analysis { entries: entries.to_vec(), ..Analysis::default() };
    let mut queue: VecDeque<u32> = entries.iter().copied().collect();
    let mapped = |pc: u32| img.read_word(pc).is_some();

    while let Some(pc) = queue.pop_front() {
        if a.visited.len() >= max_instr { break; }
        if !mapped(pc) || !a.visited.insert(pc) { continue; }
        let Some(word) = img.read_word(pc) else { continue };
        let Some(d) = dec.decode(word) else { continue };
        let ft = pc.wrapping_add(2);
        let mut push = |a: &mut Analysis, to: u32, kind: EdgeKind| {
            a.edges.push(Edge { from: pc, to, kind });
            if mapped(to) { queue.push_back(to); }
        };
        match d.spec.mnemonic {
            "BRR" => {
                if let Some(t) = branch_target(&d, pc) { push(&mut a, t, EdgeKind::Branch); }
            }
            "BRR.N" | "BRR.Z" | "BRR.O" => {
                if let Some(t) = branch_target(&d, pc) { push(&mut a, t, EdgeKind::CondBranch); }
                push(&mut a, ft, EdgeKind::Fallthrough);
            }
            "BR" => { a.indirect.insert(pc); }
            "BR.N" | "BR.Z" | "BR.O" => {
                a.indirect.insert(pc);
                push(&mut a, ft, EdgeKind::Fallthrough);
            }
            "BR.SUB" => {
                a.indirect.insert(pc);
                push(&mut a, ft, EdgeKind::Call);
            }
            "RETURN" => { a.returns.insert(pc); }
            _ => push(&mut a, ft, EdgeKind::Fallthrough),
        }
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;
    use r16_asm::{assemble_source, AsmConfig};

    #[test]
    fn uncond_branch_skips_dead_code() {
        let src = "brr over\nadd r1 r1 r1\nover: out r1\nreturn\n";
        let asm = assemble_source(src, &AsmConfig::with_rom_size(16)).unwrap();
        let a = analyze_entries(&asm.image, &[0], 100);
        assert!(a.visited.contains(&0));
        assert!(!a.visited.contains(&2));
        assert!(a.visited.contains(&4));
        assert!(a.returns.contains(&6));
        assert!(a.edges.iter().any(|e| e.kind == EdgeKind::Branch && e.from == 0 && e.to == 4));
    }

    #[test]
    fn conditional_and_indirect() {
        let src = "loop: brr.z loop\nbr.sub r2 0\nbr r3 0\nnop\n";
        let asm = assemble_source(src, &AsmConfig::with_rom_size(16)).unwrap();
        let a = analyze_entries(&asm.image, &[0], 100);
        assert!(a.edges.iter().any(|e| e.kind == EdgeKind::CondBranch && e.to == 0));
        assert!(a.indirect.contains(&2) && a.indirect.contains(&4));
        assert!(!a.visited.contains(&6));
    }
}
