/// A tracked asset. The `id` is the CoinGecko coin id and is the key used when
/// merging quotes back into the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AssetDescriptor {
    pub id: &'static str,
    pub symbol: &'static str,
    pub name: &'static str,
    pub code: &'static str,
    pub color_tag: &'static str,
}

pub const CATALOG_LEN: usize = 6;

/// Declaration order here is display order everywhere else.
pub const CATALOG: [AssetDescriptor; CATALOG_LEN] = [
    AssetDescriptor {
        id: "bitcoin",
        symbol: "₿",
        name: "Bitcoin",
        code: "BTC",
        color_tag: "from-orange-400 to-orange-600",
    },
    AssetDescriptor {
        id: "ethereum",
        symbol: "Ξ",
        name: "Ethereum",
        code: "ETH",
        color_tag: "from-blue-400 to-purple-600",
    },
    AssetDescriptor {
        id: "solana",
        symbol: "◎",
        name: "Solana",
        code: "SOL",
        color_tag: "from-purple-400 to-pink-600",
    },
    AssetDescriptor {
        id: "cardano",
        symbol: "₳",
        name: "Cardano",
        code: "ADA",
        color_tag: "from-blue-400 to-cyan-600",
    },
    AssetDescriptor {
        id: "chainlink",
        symbol: "⬟",
        name: "Chainlink",
        code: "LINK",
        color_tag: "from-blue-500 to-blue-700",
    },
    AssetDescriptor {
        id: "avalanche-2",
        symbol: "▲",
        name: "Avalanche",
        code: "AVAX",
        color_tag: "from-red-400 to-red-600",
    },
];

pub fn ids() -> Vec<String> {
    CATALOG.iter().map(|asset| asset.id.to_string()).collect()
}

pub fn find(id: &str) -> Option<&'static AssetDescriptor> {
    CATALOG.iter().find(|asset| asset.id == id)
}
