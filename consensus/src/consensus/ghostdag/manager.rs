use std::collections::{hash_map::Entry, BinaryHeap, HashMap};

use consensus_core::{ghostdag::BlockGhostdagData, Hash};

use crate::consensus::storage::ConsensusStorage;
use crate::errors::ConsensusResult;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Side {
    /// Reached from the selected parent
    SelectedPast,
    /// Reached only from the other parents so far
    Candidate,
    /// Popped as a candidate, part of the mergeset
    Merged,
}

/// Colors every merged block blue. The selected parent is the parent with the
/// highest (blue score, hash), and the mergeset is everything in the past of the
/// block that is not in the past of the selected parent.
#[derive(Debug, Default, Clone, Copy)]
pub struct GhostdagManager;

impl GhostdagManager {
    pub fn new() -> Self {
        Self
    }

    pub fn genesis_ghostdag_data(&self) -> BlockGhostdagData {
        BlockGhostdagData::genesis()
    }

    fn sort_key(storage: &ConsensusStorage, hash: Hash) -> ConsensusResult<(u64, Hash)> {
        Ok((storage.ghostdag_store.get(storage.reader(), &hash)?.blue_score, hash))
    }

    pub fn find_selected_parent(&self, storage: &ConsensusStorage, parents: &[Hash]) -> ConsensusResult<Option<Hash>> {
        let mut best = None;
        for &parent in parents {
            let key = Self::sort_key(storage, parent)?;
            if best.map_or(true, |b| key > b) {
                best = Some(key);
            }
        }
        Ok(best.map(|(_, hash)| hash))
    }

    /// Orders `hashes` by descending (blue score, hash)
    pub fn sort_by_blue_score_desc(&self, storage: &ConsensusStorage, hashes: &[Hash]) -> ConsensusResult<Vec<Hash>> {
        let mut keyed = hashes.iter().map(|&h| Self::sort_key(storage, h)).collect::<ConsensusResult<Vec<_>>>()?;
        keyed.sort_unstable_by(|a, b| b.cmp(a));
        Ok(keyed.into_iter().map(|(_, hash)| hash).collect())
    }

    /// Computes the GHOSTDAG data of a block pointing at `parents`. Every parent must already be known.
    pub fn ghostdag(&self, storage: &ConsensusStorage, parents: &[Hash]) -> ConsensusResult<BlockGhostdagData> {
        let Some(selected_parent) = self.find_selected_parent(storage, parents)? else {
            return Ok(self.genesis_ghostdag_data());
        };
        let selected_parent_data = storage.ghostdag_store.get(storage.reader(), &selected_parent)?;

        let mut mergeset = self.mergeset_without_selected_parent(storage, selected_parent, parents)?;
        mergeset.sort_unstable();

        let blue_score = selected_parent_data.blue_score + 1 + mergeset.len() as u64;
        let mut mergeset_blues = Vec::with_capacity(mergeset.len() + 1);
        mergeset_blues.push(selected_parent);
        mergeset_blues.extend(mergeset.into_iter().map(|(_, hash)| hash));

        Ok(BlockGhostdagData::new(blue_score, selected_parent, mergeset_blues, Vec::new()))
    }

    /// Walks the past of `parents` in descending blue score order. Blue scores strictly grow from
    /// parent to child, so by the time a block is popped every path from the selected parent down
    /// to it has already been expanded.
    fn mergeset_without_selected_parent(
        &self,
        storage: &ConsensusStorage,
        selected_parent: Hash,
        parents: &[Hash],
    ) -> ConsensusResult<Vec<(u64, Hash)>> {
        let mut walk = PastWalk::new(storage);
        walk.sides.insert(selected_parent, Side::SelectedPast);
        walk.push_parents(selected_parent, Side::SelectedPast)?;
        for &parent in parents.iter().filter(|&&p| p != selected_parent) {
            walk.push(parent, Side::Candidate)?;
        }

        let mut mergeset = Vec::new();
        while walk.pending_candidates > 0 {
            let Some((blue_score, current)) = walk.queue.pop() else { break };
            let side = walk.sides[&current];
            if side == Side::Candidate {
                walk.pending_candidates -= 1;
                walk.sides.insert(current, Side::Merged);
                mergeset.push((blue_score, current));
            }
            walk.push_parents(current, side)?;
        }
        Ok(mergeset)
    }

}

fn parents_of(storage: &ConsensusStorage, hash: Hash) -> ConsensusResult<Vec<Hash>> {
    Ok(storage.block_store.block(storage.reader(), &hash)?.header.parents)
}

struct PastWalk<'a> {
    storage: &'a ConsensusStorage,
    sides: HashMap<Hash, Side>,
    queue: BinaryHeap<(u64, Hash)>,
    pending_candidates: usize,
}

impl<'a> PastWalk<'a> {
    fn new(storage: &'a ConsensusStorage) -> Self {
        Self { storage, sides: HashMap::new(), queue: BinaryHeap::new(), pending_candidates: 0 }
    }

    fn push(&mut self, hash: Hash, side: Side) -> ConsensusResult<()> {
        match self.sides.entry(hash) {
            Entry::Vacant(e) => {
                e.insert(side);
                self.queue.push(GhostdagManager::sort_key(self.storage, hash)?);
                if side == Side::Candidate {
                    self.pending_candidates += 1;
                }
            }
            Entry::Occupied(mut e) => {
                if side == Side::SelectedPast && *e.get() == Side::Candidate {
                    e.insert(Side::SelectedPast);
                    self.pending_candidates -= 1;
                }
            }
        }
        Ok(())
    }

    fn push_parents(&mut self, hash: Hash, side: Side) -> ConsensusResult<()> {
        let side = if side == Side::Merged { Side::Candidate } else { side };
        for parent in parents_of(self.storage, hash)? {
            self.push(parent, side)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consensus_core::block::Block;
    use consensus_core::header::Header;
    use consensus_core::ZERO_HASH;
    use database::MemoryDb;
    use std::sync::Arc;

    /// Stages a block with `parents` and its GHOSTDAG data, returning its hash
    fn add(storage: &mut ConsensusStorage, nonce: u64, parents: Vec<Hash>) -> Hash {
        let manager = GhostdagManager::new();
        let header = Header::new_finalized(1, parents.clone(), ZERO_HASH, ZERO_HASH, 0, 0, nonce);
        let hash = header.hash;
        let data = manager.ghostdag(storage, &parents).unwrap();
        storage.block_store.stage(Block::new(header, vec![]));
        storage.ghostdag_store.stage(hash, data);
        hash
    }

    #[test]
    fn test_diamond_merges_the_other_branch() {
        let mut storage = ConsensusStorage::new(Arc::new(MemoryDb::new()));
        let manager = GhostdagManager::new();
        let genesis = add(&mut storage, 0, vec![]);
        let a = add(&mut storage, 1, vec![genesis]);
        let b = add(&mut storage, 2, vec![genesis]);
        let a2 = add(&mut storage, 3, vec![a]);

        let data = manager.ghostdag(&storage, &[b, a2]).unwrap();
        assert_eq!(data.selected_parent, a2);
        assert_eq!(data.mergeset_blues, vec![a2, b]);
        assert_eq!(data.blue_score, 4);
        assert!(data.mergeset_reds.is_empty());
    }

    #[test]
    fn test_mergeset_reaches_below_parents() {
        let mut storage = ConsensusStorage::new(Arc::new(MemoryDb::new()));
        let manager = GhostdagManager::new();
        let genesis = add(&mut storage, 0, vec![]);
        let a = add(&mut storage, 1, vec![genesis]);
        let a2 = add(&mut storage, 2, vec![a]);
        let a3 = add(&mut storage, 3, vec![a2]);
        let b = add(&mut storage, 4, vec![genesis]);
        let b2 = add(&mut storage, 5, vec![b]);

        let data = manager.ghostdag(&storage, &[a3, b2]).unwrap();
        assert_eq!(data.selected_parent, a3);
        // Non-selected blocks come in ascending blue score order
        assert_eq!(data.mergeset_blues, vec![a3, b, b2]);
        assert_eq!(data.blue_score, 3 + 1 + 2);
    }

    #[test]
    fn test_sort_and_selected_parent_agree() {
        let mut storage = ConsensusStorage::new(Arc::new(MemoryDb::new()));
        let manager = GhostdagManager::new();
        let genesis = add(&mut storage, 0, vec![]);
        let a = add(&mut storage, 1, vec![genesis]);
        let b = add(&mut storage, 2, vec![genesis]);
        let a2 = add(&mut storage, 3, vec![a]);

        let sorted = manager.sort_by_blue_score_desc(&storage, &[a, b, a2, genesis]).unwrap();
        assert_eq!(sorted[0], a2);
        assert_eq!(sorted[3], genesis);
        assert_eq!(manager.find_selected_parent(&storage, &[a, b]).unwrap(), Some(sorted[1]));
        assert_eq!(manager.ghostdag(&storage, &[]).unwrap(), BlockGhostdagData::genesis());
    }
}
